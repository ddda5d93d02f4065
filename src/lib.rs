//! # ttsprep - dataset and audio plumbing for TTS fine-tuning
//!
//! Two independent utilities that sit around a speech synthesis engine:
//!
//! 1. **Manifest building** ([`ManifestBuilder`]): turns a delimited metadata
//!    table (`audio_path|text|speaker_id`) into a JSONL manifest, validating
//!    every row against an audio root directory. Bad rows are skipped and
//!    counted, never fatal.
//!
//! 2. **Audio persistence** ([`AudioPersistor`]): writes a decoded
//!    [`AudioBuffer`] to a WAV file with a primary backend that honours the
//!    requested subtype, and falls back to a secondary backend when the primary
//!    one fails.
//!
//! ## Building a manifest
//!
//! ```no_run
//! use ttsprep::{ManifestBuilder, ManifestOptions};
//!
//! let summary = ManifestBuilder::new(ManifestOptions::default())
//!     .build("metadata.csv", "/data/wavs", "manifests/vi_raw.jsonl")
//!     .unwrap();
//! println!("{} written, {} skipped", summary.processed, summary.skipped);
//! ```
//!
//! ## Saving audio
//!
//! ```no_run
//! use ttsprep::{AudioBackends, AudioBuffer, AudioPersistor};
//!
//! let buffer = AudioBuffer::from_channels(vec![vec![0.0; 24000]]).unwrap();
//! let persistor = AudioPersistor::new(AudioBackends::detect());
//! persistor.save("out.wav", &buffer, 24000, "PCM_16").unwrap();
//! ```

pub mod audio;
pub mod config;
pub mod logging;
pub mod manifest;
pub mod perf;

pub use audio::backend::{AudioBackends, BackendError};
pub use audio::buffer::AudioBuffer;
pub use audio::persist::{save_audio, AudioPersistor, SaveError, SavedWith};
pub use audio::subtype::{Subtype, DEFAULT_SUBTYPE};
pub use config::{load_config, Config};
pub use manifest::{build_manifest, ManifestBuilder, ManifestError, ManifestOptions, ManifestSummary};
