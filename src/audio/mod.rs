//! Audio buffers and their persistence to WAV files.
//!
//! [`persist::AudioPersistor`] writes an [`buffer::AudioBuffer`] through a
//! primary backend and falls back to a secondary one; [`io::WavIo`] reads WAV
//! files back for re-encoding and verification.

pub mod backend;
pub mod buffer;
pub mod io;
pub mod persist;
pub mod subtype;
