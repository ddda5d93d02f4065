use anyhow::Result;
use hound::{SampleFormat, WavReader, WavSpec};
use std::path::Path;

use super::buffer::AudioBuffer;

/// Basic facts about a WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavInfo {
    pub spec: WavSpec,
    /// Samples per channel.
    pub frames: u32,
}

#[derive(Debug, Default)]
pub struct WavIo;

impl WavIo {
    /// Decode a WAV file into per-channel samples in `[-1, 1]`.
    pub fn read_wav(path: impl AsRef<Path>) -> Result<(Vec<Vec<f32>>, u32)> {
        let mut reader = WavReader::open(path)?;
        let spec = reader.spec();
        let channels = spec.channels as usize;
        let sample_rate = spec.sample_rate;
        let mut samples = vec![Vec::new(); channels];

        match spec.sample_format {
            SampleFormat::Float => {
                for (idx, sample) in reader.samples::<f32>().enumerate() {
                    let value = sample?;
                    samples[idx % channels].push(value);
                }
            }
            SampleFormat::Int => {
                let max = (1_i64 << (spec.bits_per_sample - 1)) as f32;
                for (idx, sample) in reader.samples::<i32>().enumerate() {
                    let value = sample? as f32 / max;
                    samples[idx % channels].push(value);
                }
            }
        }

        Ok((samples, sample_rate))
    }

    /// Decode a WAV file into a planar `(channels, samples)` buffer.
    pub fn read_buffer(path: impl AsRef<Path>) -> Result<(AudioBuffer, u32)> {
        let (channels, sample_rate) = Self::read_wav(path)?;
        Ok((AudioBuffer::from_channels(channels)?, sample_rate))
    }

    pub fn info(path: impl AsRef<Path>) -> Result<WavInfo> {
        let reader = WavReader::open(path)?;
        Ok(WavInfo {
            spec: reader.spec(),
            frames: reader.duration(),
        })
    }
}
