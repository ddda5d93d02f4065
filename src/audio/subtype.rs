use hound::{SampleFormat, WavSpec};
use std::fmt;
use std::str::FromStr;

/// Subtype used when the caller does not ask for one.
pub const DEFAULT_SUBTYPE: &str = "PCM_16";

/// Sample encodings the primary backend can write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Subtype {
    PcmU8,
    #[default]
    Pcm16,
    Pcm24,
    Pcm32,
    Float,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown audio subtype {0:?} (expected PCM_U8, PCM_16, PCM_24, PCM_32 or FLOAT)")]
pub struct UnknownSubtype(pub String);

impl Subtype {
    pub fn as_str(self) -> &'static str {
        match self {
            Subtype::PcmU8 => "PCM_U8",
            Subtype::Pcm16 => "PCM_16",
            Subtype::Pcm24 => "PCM_24",
            Subtype::Pcm32 => "PCM_32",
            Subtype::Float => "FLOAT",
        }
    }

    pub fn bits_per_sample(self) -> u16 {
        match self {
            Subtype::PcmU8 => 8,
            Subtype::Pcm16 => 16,
            Subtype::Pcm24 => 24,
            Subtype::Pcm32 | Subtype::Float => 32,
        }
    }

    pub fn sample_format(self) -> SampleFormat {
        match self {
            Subtype::Float => SampleFormat::Float,
            _ => SampleFormat::Int,
        }
    }

    pub fn wav_spec(self, channels: u16, sample_rate: u32) -> WavSpec {
        WavSpec {
            channels,
            sample_rate,
            bits_per_sample: self.bits_per_sample(),
            sample_format: self.sample_format(),
        }
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subtype {
    type Err = UnknownSubtype;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PCM_U8" => Ok(Subtype::PcmU8),
            "PCM_16" => Ok(Subtype::Pcm16),
            "PCM_24" => Ok(Subtype::Pcm24),
            "PCM_32" => Ok(Subtype::Pcm32),
            "FLOAT" => Ok(Subtype::Float),
            _ => Err(UnknownSubtype(s.to_string())),
        }
    }
}
