use csv::{ByteRecord, ReaderBuilder, StringRecord, Terminator};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::record::{ManifestRecord, ManifestSummary, RawRow, SkipReason};
use super::writer::ManifestWriter;
use super::{ManifestError, DEFAULT_DELIMITER, DEFAULT_LANGUAGE, REQUIRED_COLUMNS};
use crate::perf::{self, Metric};

/// Run-wide settings for a manifest build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestOptions {
    /// Single-character column delimiter.
    pub delimiter: String,
    /// Language tag stamped on every record.
    pub language: String,
}

impl Default for ManifestOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl ManifestOptions {
    fn delimiter_byte(&self) -> Result<u8, ManifestError> {
        match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(ManifestError::InvalidDelimiter(self.delimiter.clone())),
        }
    }
}

/// Positions of the required columns within the header.
#[derive(Debug, Clone, Copy)]
struct Columns {
    audio_path: usize,
    text: usize,
    speaker_id: usize,
    width: usize,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, ManifestError> {
        // Later duplicates of a column shadow earlier ones.
        let find = |name: &str| {
            headers
                .iter()
                .collect::<Vec<_>>()
                .into_iter()
                .rposition(|h| h.trim_end_matches('\r') == name)
        };
        let positions = REQUIRED_COLUMNS.map(find);
        match positions {
            [Some(audio_path), Some(text), Some(speaker_id)] => Ok(Self {
                audio_path,
                text,
                speaker_id,
                width: headers.len(),
            }),
            _ => {
                let mut missing: Vec<String> = REQUIRED_COLUMNS
                    .iter()
                    .zip(positions)
                    .filter(|(_, position)| position.is_none())
                    .map(|(name, _)| name.to_string())
                    .collect();
                missing.sort();
                Err(ManifestError::MissingColumns(missing))
            }
        }
    }

    /// Decode a data row, rejecting wrong widths and non-UTF-8 fields.
    fn row(&self, record: &ByteRecord) -> Result<RawRow, SkipReason> {
        if record.len() != self.width {
            return Err(SkipReason::Malformed);
        }
        let mut fields = Vec::with_capacity(record.len());
        for field in record {
            fields.push(std::str::from_utf8(field).map_err(|_| SkipReason::Malformed)?);
        }
        Ok(RawRow::new(
            fields[self.audio_path],
            fields[self.text],
            fields[self.speaker_id],
        ))
    }
}

/// Number of `\n` bytes inside the fields of `record`.
fn embedded_newlines(record: &ByteRecord) -> u64 {
    record
        .iter()
        .map(|field| field.iter().filter(|&&b| b == b'\n').count() as u64)
        .sum()
}

/// Converts a metadata table into a JSONL manifest.
#[derive(Debug, Clone, Default)]
pub struct ManifestBuilder {
    options: ManifestOptions,
}

impl ManifestBuilder {
    pub fn new(options: ManifestOptions) -> Self {
        Self { options }
    }

    /// Validate every row of `csv_path` and stream the accepted ones to
    /// `output_path`.
    ///
    /// # Errors
    ///
    /// Fails before reading any row when the table or audio root is missing,
    /// the delimiter is invalid, or the header lacks a required column. I/O
    /// errors on either file are also fatal. Bad rows, including entirely
    /// blank lines, are only counted.
    pub fn build(
        &self,
        csv_path: impl AsRef<Path>,
        audio_root: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
    ) -> Result<ManifestSummary, ManifestError> {
        let _span = perf::span(Metric::ManifestBuild);
        let delimiter = self.options.delimiter_byte()?;
        let csv_path = csv_path.as_ref();
        let audio_root = audio_root.as_ref();
        let output_path = output_path.as_ref();

        if !csv_path.is_file() {
            return Err(ManifestError::CsvNotFound(csv_path.to_path_buf()));
        }
        if !audio_root.is_dir() {
            return Err(ManifestError::AudioRootNotDirectory(
                audio_root.to_path_buf(),
            ));
        }
        let audio_root =
            fs::canonicalize(audio_root).map_err(|e| ManifestError::io(audio_root, e))?;

        let csv_error = |source: csv::Error| ManifestError::Csv {
            path: csv_path.to_path_buf(),
            source,
        };
        // The reader silently drops blank lines; they are recovered from the
        // line counter, which needs every record (the last one included) to
        // end in a newline. The extra newline is discounted at the end.
        let input = File::open(csv_path)
            .map_err(|e| ManifestError::io(csv_path, e))?
            .chain(&b"\n"[..]);
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .terminator(Terminator::Any(b'\n'))
            .has_headers(true)
            .flexible(true)
            .from_reader(input);
        let columns = Columns::from_headers(reader.headers().map_err(csv_error)?)?;

        let mut writer = ManifestWriter::create(output_path)?;
        let mut summary = ManifestSummary::default();
        let mut record = ByteRecord::new();

        loop {
            let start = reader.position().line();
            let more = reader.read_byte_record(&mut record).map_err(csv_error)?;
            let consumed = reader.position().line() - start;
            let blank = if more {
                consumed.saturating_sub(embedded_newlines(&record) + 1)
            } else {
                consumed.saturating_sub(1)
            };
            for offset in 0..blank {
                debug!(line = start + offset, reason = %SkipReason::Malformed, "skipping blank line");
                summary.record_skip(SkipReason::Malformed);
            }
            if !more {
                break;
            }
            let line = start + blank;

            let converted = columns
                .row(&record)
                .and_then(|row| self.convert(&row, &audio_root));
            match converted {
                Ok(entry) => {
                    writer.append(&entry)?;
                    summary.record_processed();
                }
                Err(reason) => {
                    debug!(line, %reason, "skipping row");
                    summary.record_skip(reason);
                }
            }
        }

        let written = writer.finish()?;
        debug_assert_eq!(written, summary.processed);
        perf::add_count(Metric::ManifestRowsProcessed, summary.processed as u64);
        perf::add_count(Metric::ManifestRowsSkipped, summary.skipped as u64);
        info!(
            processed = summary.processed,
            skipped = summary.skipped,
            output = %output_path.display(),
            "manifest written"
        );
        Ok(summary)
    }

    /// Turn one trimmed row into a record, or say why it was rejected.
    pub fn convert(&self, row: &RawRow, audio_root: &Path) -> Result<ManifestRecord, SkipReason> {
        if row.audio_path.is_empty() {
            return Err(SkipReason::EmptyAudioPath);
        }
        if row.text.is_empty() {
            return Err(SkipReason::EmptyText);
        }
        let audio = resolve_audio(audio_root, &row.audio_path).ok_or(SkipReason::MissingAudio)?;

        Ok(ManifestRecord {
            id: row.stem(),
            audio: audio.to_string_lossy().into_owned(),
            text: row.text.clone(),
            speaker: row.speaker().to_string(),
            language: self.options.language.clone(),
        })
    }
}

/// Absolute path of an existing regular file under `audio_root`.
fn resolve_audio(audio_root: &Path, relative: &str) -> Option<PathBuf> {
    let resolved = fs::canonicalize(audio_root.join(relative)).ok()?;
    resolved.is_file().then_some(resolved)
}
