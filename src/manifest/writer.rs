use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{ManifestError, ManifestRecord};

/// Append-only JSONL sink for manifest records.
///
/// Records are written through as they arrive so memory use does not grow with
/// the table size. The file is closed when the writer is dropped; call
/// [`ManifestWriter::finish`] to flush and observe write errors.
pub struct ManifestWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    lines: usize,
}

impl ManifestWriter {
    /// Create (or truncate) the manifest, creating parent directories.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ManifestError::io(parent, e))?;
        }
        let file = File::create(path).map_err(|e| ManifestError::io(path, e))?;
        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            lines: 0,
        })
    }

    pub fn append(&mut self, record: &ManifestRecord) -> Result<(), ManifestError> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer
            .write_all(b"\n")
            .map_err(|e| ManifestError::io(&self.path, e))?;
        self.lines += 1;
        Ok(())
    }

    /// Lines appended so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Flush buffered records and close the file, returning the line count.
    pub fn finish(mut self) -> Result<usize, ManifestError> {
        self.writer
            .flush()
            .map_err(|e| ManifestError::io(&self.path, e))?;
        Ok(self.lines)
    }
}
