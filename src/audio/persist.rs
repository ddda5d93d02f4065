//! Writing decoded audio to disk with a primary/secondary backend chain.
//!
//! [`AudioPersistor::save`] runs two explicit attempts in a fixed order:
//!
//! 1. the primary backend, fed channel-last frames and the requested subtype;
//! 2. the secondary backend, fed the buffer in its original layout.
//!
//! The first success wins. When both fail the caller receives a single
//! [`SaveError::BothBackendsFailed`] carrying both causes, with the primary
//! failure as its [`source`](std::error::Error::source).

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::backend::{AudioBackends, BackendError};
use super::buffer::AudioBuffer;
use super::subtype::DEFAULT_SUBTYPE;
use crate::perf::{self, Metric};

/// Which backend produced the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavedWith {
    Primary,
    Secondary,
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("sampling rate must be a positive number of samples per second")]
    InvalidSampleRate,
    #[error(
        "failed to save audio to {} with both the primary and secondary backends \
         (primary: {primary}; secondary: {secondary}). Enable the primary `hound` \
         backend (`audio.primary_backend: true`) and make sure the destination is a \
         writable .wav path",
        .path.display()
    )]
    BothBackendsFailed {
        path: PathBuf,
        #[source]
        primary: BackendError,
        secondary: BackendError,
    },
}

/// Persists [`AudioBuffer`]s using a fixed set of backends.
#[derive(Debug, Default)]
pub struct AudioPersistor {
    backends: AudioBackends,
}

impl AudioPersistor {
    pub fn new(backends: AudioBackends) -> Self {
        Self { backends }
    }

    pub fn backends(&self) -> &AudioBackends {
        &self.backends
    }

    /// Write `buffer` to `path`, falling back to the secondary backend when the
    /// primary one fails.
    ///
    /// `subtype` only applies when the primary backend succeeds.
    pub fn save(
        &self,
        path: impl AsRef<Path>,
        buffer: &AudioBuffer,
        sampling_rate: u32,
        subtype: &str,
    ) -> Result<SavedWith, SaveError> {
        let _span = perf::span(Metric::AudioSave);
        let path = path.as_ref();
        if sampling_rate == 0 {
            return Err(SaveError::InvalidSampleRate);
        }

        let primary = match self.try_primary(path, buffer, sampling_rate, subtype) {
            Ok(()) => {
                debug!(path = %path.display(), subtype, "audio written by primary backend");
                return Ok(SavedWith::Primary);
            }
            Err(err) => err,
        };
        perf::add_count(Metric::AudioPrimaryFailures, 1);
        warn!(
            path = %path.display(),
            error = %primary,
            "primary audio backend failed, falling back"
        );

        match self.try_secondary(path, buffer, sampling_rate) {
            Ok(()) => {
                perf::add_count(Metric::AudioSecondaryWrites, 1);
                debug!(path = %path.display(), "audio written by secondary backend");
                Ok(SavedWith::Secondary)
            }
            Err(secondary) => Err(SaveError::BothBackendsFailed {
                path: path.to_path_buf(),
                primary,
                secondary,
            }),
        }
    }

    /// [`save`](Self::save) with the default `PCM_16` subtype.
    pub fn save_default(
        &self,
        path: impl AsRef<Path>,
        buffer: &AudioBuffer,
        sampling_rate: u32,
    ) -> Result<SavedWith, SaveError> {
        self.save(path, buffer, sampling_rate, DEFAULT_SUBTYPE)
    }

    /// One attempt with the primary backend.
    pub fn try_primary(
        &self,
        path: &Path,
        buffer: &AudioBuffer,
        sampling_rate: u32,
        subtype: &str,
    ) -> Result<(), BackendError> {
        let backend = self
            .backends
            .primary()
            .ok_or(BackendError::Unavailable("primary"))?;
        let frames = buffer.to_channels_last();
        backend.write(path, frames.view(), sampling_rate, subtype)
    }

    /// One attempt with the secondary backend.
    pub fn try_secondary(
        &self,
        path: &Path,
        buffer: &AudioBuffer,
        sampling_rate: u32,
    ) -> Result<(), BackendError> {
        let backend = self
            .backends
            .secondary()
            .ok_or(BackendError::Unavailable("secondary"))?;
        backend.write(path, buffer, sampling_rate)
    }
}

/// Save with every available backend; see [`AudioPersistor::save`].
pub fn save_audio(
    path: impl AsRef<Path>,
    buffer: &AudioBuffer,
    sampling_rate: u32,
    subtype: &str,
) -> Result<SavedWith, SaveError> {
    AudioPersistor::default().save(path, buffer, sampling_rate, subtype)
}
