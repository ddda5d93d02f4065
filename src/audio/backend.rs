//! Audio encoding backends and the capability set handed to the persistor.
//!
//! Two backends with different capability surfaces are available:
//!
//! - [`HoundBackend`] (primary) writes channel-last frames with a caller-chosen
//!   [`Subtype`].
//! - [`RiffFloatBackend`] (secondary) writes the buffer in its original layout
//!   as 32-bit IEEE float and takes no subtype.
//!
//! Which backends may be used is decided once, when an [`AudioBackends`] value
//! is built, and can be queried afterwards.

use hound::WavWriter;
use ndarray::{ArrayViewD, Axis, Ix2};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::buffer::AudioBuffer;
use super::subtype::{Subtype, UnknownSubtype};

/// Why a single backend failed to write a file.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("no {0} audio backend is configured")]
    Unavailable(&'static str),
    #[error(transparent)]
    UnsupportedSubtype(#[from] UnknownSubtype),
    #[error("unsupported container {extension:?} for {} (only .wav is supported)", .path.display())]
    UnsupportedContainer { path: PathBuf, extension: String },
    #[error("{0} channels cannot be stored in a WAV file")]
    TooManyChannels(usize),
    #[error("audio data too large for a WAV file")]
    TooLarge,
    #[error("WAV encoding failed: {0}")]
    Hound(#[from] hound::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Backend that honours an encoding subtype.
pub trait PrimaryBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Write channel-last `frames`, either `(samples,)` or `(samples, channels)`.
    fn write(
        &self,
        path: &Path,
        frames: ArrayViewD<'_, f32>,
        sample_rate: u32,
        subtype: &str,
    ) -> Result<(), BackendError>;
}

/// Backend with a fixed encoding, fed the buffer in its original layout.
pub trait FallbackBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn write(&self, path: &Path, buffer: &AudioBuffer, sample_rate: u32)
        -> Result<(), BackendError>;
}

fn ensure_wav_container(path: &Path) -> Result<(), BackendError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    if extension.eq_ignore_ascii_case("wav") {
        Ok(())
    } else {
        Err(BackendError::UnsupportedContainer {
            path: path.to_path_buf(),
            extension: extension.to_string(),
        })
    }
}

fn channel_count(channels: usize) -> Result<u16, BackendError> {
    u16::try_from(channels).map_err(|_| BackendError::TooManyChannels(channels))
}

/// Primary backend built on `hound`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HoundBackend;

impl PrimaryBackend for HoundBackend {
    fn name(&self) -> &'static str {
        "hound"
    }

    fn write(
        &self,
        path: &Path,
        frames: ArrayViewD<'_, f32>,
        sample_rate: u32,
        subtype: &str,
    ) -> Result<(), BackendError> {
        let subtype: Subtype = subtype.parse()?;
        ensure_wav_container(path)?;
        let channels = match frames.ndim() {
            1 => 1,
            _ => frames.shape()[1],
        };
        let spec = subtype.wav_spec(channel_count(channels)?, sample_rate);
        let mut writer = WavWriter::create(path, spec)?;

        for &sample in frames.iter() {
            let value = sample.clamp(-1.0, 1.0);
            match subtype {
                Subtype::PcmU8 => writer.write_sample((value * i8::MAX as f32).round() as i8)?,
                Subtype::Pcm16 => writer.write_sample((value * i16::MAX as f32).round() as i16)?,
                Subtype::Pcm24 => writer.write_sample((value * 8_388_607.0).round() as i32)?,
                Subtype::Pcm32 => {
                    writer.write_sample((f64::from(value) * i32::MAX as f64).round() as i32)?
                }
                Subtype::Float => writer.write_sample(sample)?,
            }
        }

        writer.finalize()?;
        Ok(())
    }
}

const WAVE_FORMAT_IEEE_FLOAT: u16 = 3;
// fmt (18 + 8) + fact (4 + 8) + data header (8) + "WAVE"
const RIFF_OVERHEAD: u64 = 26 + 12 + 8 + 4;

/// Secondary backend: a plain RIFF/WAVE writer emitting 32-bit float samples.
#[derive(Debug, Default, Clone, Copy)]
pub struct RiffFloatBackend;

impl FallbackBackend for RiffFloatBackend {
    fn name(&self) -> &'static str {
        "riff-float"
    }

    fn write(
        &self,
        path: &Path,
        buffer: &AudioBuffer,
        sample_rate: u32,
    ) -> Result<(), BackendError> {
        ensure_wav_container(path)?;
        let channels = channel_count(buffer.channels())?;
        let frames = buffer.frames();
        let data_len = frames as u64 * u64::from(channels) * 4;
        if data_len + RIFF_OVERHEAD > u64::from(u32::MAX) {
            return Err(BackendError::TooLarge);
        }
        let data_len = data_len as u32;
        let block_align = channels.checked_mul(4).ok_or(BackendError::TooLarge)?;
        let byte_rate = sample_rate
            .checked_mul(u32::from(block_align))
            .ok_or(BackendError::TooLarge)?;

        let mut out = BufWriter::new(File::create(path)?);
        out.write_all(b"RIFF")?;
        out.write_all(&(data_len + RIFF_OVERHEAD as u32).to_le_bytes())?;
        out.write_all(b"WAVE")?;

        out.write_all(b"fmt ")?;
        out.write_all(&18u32.to_le_bytes())?;
        out.write_all(&WAVE_FORMAT_IEEE_FLOAT.to_le_bytes())?;
        out.write_all(&channels.to_le_bytes())?;
        out.write_all(&sample_rate.to_le_bytes())?;
        out.write_all(&byte_rate.to_le_bytes())?;
        out.write_all(&block_align.to_le_bytes())?;
        out.write_all(&32u16.to_le_bytes())?;
        out.write_all(&0u16.to_le_bytes())?;

        // Non-PCM formats carry the per-channel sample count in a fact chunk.
        out.write_all(b"fact")?;
        out.write_all(&4u32.to_le_bytes())?;
        out.write_all(&(frames as u32).to_le_bytes())?;

        out.write_all(b"data")?;
        out.write_all(&data_len.to_le_bytes())?;
        let view = buffer.view();
        match view.view().into_dimensionality::<Ix2>() {
            Ok(planar) => {
                for frame in planar.axis_iter(Axis(1)) {
                    for sample in frame {
                        out.write_all(&sample.to_le_bytes())?;
                    }
                }
            }
            Err(_) => {
                for sample in view.iter() {
                    out.write_all(&sample.to_le_bytes())?;
                }
            }
        }

        out.flush()?;
        Ok(())
    }
}

/// The set of backends an [`AudioPersistor`](super::persist::AudioPersistor)
/// may use.
pub struct AudioBackends {
    primary: Option<Box<dyn PrimaryBackend>>,
    secondary: Option<Box<dyn FallbackBackend>>,
}

impl AudioBackends {
    /// Every backend compiled into this build.
    pub fn detect() -> Self {
        Self {
            primary: Some(Box::new(HoundBackend)),
            secondary: Some(Box::new(RiffFloatBackend)),
        }
    }

    /// No backends at all; every save fails.
    pub fn none() -> Self {
        Self {
            primary: None,
            secondary: None,
        }
    }

    pub fn with_primary(mut self, backend: impl PrimaryBackend + 'static) -> Self {
        self.primary = Some(Box::new(backend));
        self
    }

    pub fn with_secondary(mut self, backend: impl FallbackBackend + 'static) -> Self {
        self.secondary = Some(Box::new(backend));
        self
    }

    pub fn without_primary(mut self) -> Self {
        self.primary = None;
        self
    }

    pub fn without_secondary(mut self) -> Self {
        self.secondary = None;
        self
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    pub fn has_secondary(&self) -> bool {
        self.secondary.is_some()
    }

    pub fn primary(&self) -> Option<&dyn PrimaryBackend> {
        self.primary.as_deref()
    }

    pub fn secondary(&self) -> Option<&dyn FallbackBackend> {
        self.secondary.as_deref()
    }
}

impl Default for AudioBackends {
    fn default() -> Self {
        Self::detect()
    }
}

impl fmt::Debug for AudioBackends {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioBackends")
            .field("primary", &self.primary().map(|b| b.name()))
            .field("secondary", &self.secondary().map(|b| b.name()))
            .finish()
    }
}
