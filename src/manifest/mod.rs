//! Metadata table to JSONL manifest conversion.
//!
//! A manifest is the line-delimited record file consumed by dataset loaders.
//! [`ManifestBuilder`] validates every row of a delimited metadata table
//! (`audio_path|text|speaker_id`) against an audio root directory and streams
//! one [`ManifestRecord`] per valid row to disk. Rejected rows are counted in
//! the returned [`ManifestSummary`] and never abort the run.

pub mod builder;
pub mod record;
pub mod writer;

use std::path::{Path, PathBuf};

pub use builder::{ManifestBuilder, ManifestOptions};
pub use record::{ManifestRecord, ManifestSummary, RawRow, SkipCounts, SkipReason};
pub use writer::ManifestWriter;

/// Default column delimiter of metadata tables.
pub const DEFAULT_DELIMITER: &str = "|";
/// Default language tag written into records.
pub const DEFAULT_LANGUAGE: &str = "vi";
/// Speaker assigned to rows with a blank `speaker_id`.
pub const DEFAULT_SPEAKER: &str = "spk_default";
/// Columns every metadata table must declare.
pub const REQUIRED_COLUMNS: [&str; 3] = ["audio_path", "text", "speaker_id"];

/// Fatal errors raised while building a manifest.
///
/// Row-level problems are not errors; they show up as [`SkipReason`]s.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("metadata CSV not found: {}", .0.display())]
    CsvNotFound(PathBuf),
    #[error("audio root is not a directory: {}", .0.display())]
    AudioRootNotDirectory(PathBuf),
    #[error("CSV missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(String),
    #[error("failed to read metadata table {}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write manifest record")]
    Serialize(#[from] serde_json::Error),
}

impl ManifestError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Build a manifest in one call.
///
/// Equivalent to `ManifestBuilder::new(options).build(..)` with the given
/// delimiter and language tag.
pub fn build_manifest(
    csv_path: impl AsRef<Path>,
    audio_root: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    delimiter: &str,
    language: &str,
) -> Result<ManifestSummary, ManifestError> {
    ManifestBuilder::new(ManifestOptions {
        delimiter: delimiter.to_string(),
        language: language.to_string(),
    })
    .build(csv_path, audio_root, output_path)
}
