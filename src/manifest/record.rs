use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use super::DEFAULT_SPEAKER;

/// One data row of the metadata table, fields already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub audio_path: String,
    pub text: String,
    pub speaker_id: String,
}

impl RawRow {
    pub fn new(audio_path: &str, text: &str, speaker_id: &str) -> Self {
        Self {
            audio_path: audio_path.trim().to_string(),
            text: text.trim().to_string(),
            speaker_id: speaker_id.trim().to_string(),
        }
    }

    /// Speaker to record, falling back to [`DEFAULT_SPEAKER`] when blank.
    pub fn speaker(&self) -> &str {
        if self.speaker_id.is_empty() {
            DEFAULT_SPEAKER
        } else {
            &self.speaker_id
        }
    }

    /// Filename stem of the audio path, used as the record id.
    pub fn stem(&self) -> String {
        Path::new(&self.audio_path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// A validated manifest entry, serialized as one JSON line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRecord {
    pub id: String,
    pub audio: String,
    pub text: String,
    pub speaker: String,
    pub language: String,
}

/// Why a metadata row was left out of the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Wrong column count or undecodable bytes.
    Malformed,
    EmptyAudioPath,
    EmptyText,
    /// The resolved audio path is not an existing regular file.
    MissingAudio,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SkipReason::Malformed => "malformed row",
            SkipReason::EmptyAudioPath => "empty audio_path",
            SkipReason::EmptyText => "empty text",
            SkipReason::MissingAudio => "audio file not found",
        };
        f.write_str(label)
    }
}

/// Skip tallies broken down by [`SkipReason`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkipCounts {
    pub malformed: usize,
    pub empty_audio_path: usize,
    pub empty_text: usize,
    pub missing_audio: usize,
}

impl SkipCounts {
    pub fn get(&self, reason: SkipReason) -> usize {
        match reason {
            SkipReason::Malformed => self.malformed,
            SkipReason::EmptyAudioPath => self.empty_audio_path,
            SkipReason::EmptyText => self.empty_text,
            SkipReason::MissingAudio => self.missing_audio,
        }
    }

    fn slot(&mut self, reason: SkipReason) -> &mut usize {
        match reason {
            SkipReason::Malformed => &mut self.malformed,
            SkipReason::EmptyAudioPath => &mut self.empty_audio_path,
            SkipReason::EmptyText => &mut self.empty_text,
            SkipReason::MissingAudio => &mut self.missing_audio,
        }
    }
}

/// Outcome of a manifest build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ManifestSummary {
    /// Rows written to the manifest.
    pub processed: usize,
    /// Rows rejected for any reason.
    pub skipped: usize,
    pub skips: SkipCounts,
}

impl ManifestSummary {
    pub(crate) fn record_processed(&mut self) {
        self.processed += 1;
    }

    pub(crate) fn record_skip(&mut self, reason: SkipReason) {
        self.skipped += 1;
        *self.skips.slot(reason) += 1;
    }

    /// Number of data rows seen.
    pub fn total(&self) -> usize {
        self.processed + self.skipped
    }
}
