mod common;

use common::stereo_samples;
use hound::{SampleFormat, WavReader};
use ndarray::ArrayViewD;
use std::error::Error as _;
use std::path::Path;
use ttsprep::audio::backend::{FallbackBackend, PrimaryBackend};
use ttsprep::audio::io::WavIo;
use ttsprep::{
    save_audio, AudioBackends, AudioBuffer, AudioPersistor, BackendError, SaveError, SavedWith,
};

struct BrokenPrimary;

impl PrimaryBackend for BrokenPrimary {
    fn name(&self) -> &'static str {
        "broken-primary"
    }

    fn write(
        &self,
        _path: &Path,
        _frames: ArrayViewD<'_, f32>,
        _sample_rate: u32,
        _subtype: &str,
    ) -> Result<(), BackendError> {
        Err(BackendError::Io(std::io::Error::other("primary codec crashed")))
    }
}

struct BrokenSecondary;

impl FallbackBackend for BrokenSecondary {
    fn name(&self) -> &'static str {
        "broken-secondary"
    }

    fn write(
        &self,
        _path: &Path,
        _buffer: &AudioBuffer,
        _sample_rate: u32,
    ) -> Result<(), BackendError> {
        Err(BackendError::Io(std::io::Error::other("secondary codec crashed")))
    }
}

#[test]
fn primary_writes_pcm16_with_requested_rate() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("speech.wav");
    let buffer = AudioBuffer::from_channels(stereo_samples(480)).unwrap();

    let saved = AudioPersistor::default()
        .save(&path, &buffer, 22050, "PCM_16")
        .expect("save");
    assert_eq!(saved, SavedWith::Primary);

    let spec = WavReader::open(&path).unwrap().spec();
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, SampleFormat::Int);

    let (decoded, sample_rate) = WavIo::read_wav(&path).expect("read wav");
    assert_eq!(sample_rate, 22050);
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[0].len(), 480);
    assert!((decoded[0][0] - -0.5).abs() < 1e-3);
    assert!((decoded[1][0] - 0.5).abs() < 1e-3);
}

#[test]
fn mono_buffer_round_trips_sample_count() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mono.wav");
    let buffer = AudioBuffer::mono(vec![0.25; 1000]);

    AudioPersistor::default()
        .save_default(&path, &buffer, 24000)
        .unwrap();
    let (decoded, sample_rate) = WavIo::read_wav(&path).unwrap();
    assert_eq!(sample_rate, 24000);
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].len(), 1000);
}

#[test]
fn disabled_primary_still_produces_a_valid_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("fallback.wav");
    let buffer = AudioBuffer::from_channels(stereo_samples(64)).unwrap();
    let persistor = AudioPersistor::new(AudioBackends::detect().without_primary());
    assert!(!persistor.backends().has_primary());

    let saved = persistor.save(&path, &buffer, 16000, "PCM_16").unwrap();
    assert_eq!(saved, SavedWith::Secondary);

    let spec = WavReader::open(&path).unwrap().spec();
    assert_eq!(spec.sample_format, SampleFormat::Float);
    let (decoded, sample_rate) = WavIo::read_wav(&path).unwrap();
    assert_eq!(sample_rate, 16000);
    assert_eq!(decoded, stereo_samples(64));
}

#[test]
fn failing_primary_falls_back_to_secondary() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("fallback.wav");
    let buffer = AudioBuffer::mono(vec![0.1, -0.1, 0.2]);
    let persistor = AudioPersistor::new(AudioBackends::detect().with_primary(BrokenPrimary));

    let saved = persistor.save(&path, &buffer, 8000, "PCM_24").unwrap();
    assert_eq!(saved, SavedWith::Secondary);
    let (decoded, _) = WavIo::read_wav(&path).unwrap();
    assert_eq!(decoded[0], vec![0.1, -0.1, 0.2]);
}

#[test]
fn both_failing_reports_both_causes_and_chains_the_primary() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("never.wav");
    let backends = AudioBackends::none()
        .with_primary(BrokenPrimary)
        .with_secondary(BrokenSecondary);
    let err = AudioPersistor::new(backends)
        .save_default(&path, &AudioBuffer::mono(vec![0.0; 8]), 16000)
        .unwrap_err();

    assert!(matches!(err, SaveError::BothBackendsFailed { .. }));
    let message = err.to_string();
    assert!(message.contains("primary codec crashed"), "{message}");
    assert!(message.contains("secondary codec crashed"), "{message}");
    assert!(message.contains("primary_backend"), "{message}");

    let source = err.source().expect("chained cause");
    assert!(source.to_string().contains("primary codec crashed"));
}

#[test]
fn unsupported_container_fails_in_both_backends() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("speech.mp3");
    let err = AudioPersistor::default()
        .save_default(&path, &AudioBuffer::mono(vec![0.0; 8]), 16000)
        .unwrap_err();
    match err {
        SaveError::BothBackendsFailed {
            primary, secondary, ..
        } => {
            assert!(matches!(primary, BackendError::UnsupportedContainer { .. }));
            assert!(matches!(secondary, BackendError::UnsupportedContainer { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!path.exists());
}

#[test]
fn save_audio_uses_every_available_backend() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("direct.wav");
    let buffer = AudioBuffer::from_channels(stereo_samples(100)).unwrap();

    let saved = save_audio(&path, &buffer, 44100, "pcm_32").expect("save");
    assert_eq!(saved, SavedWith::Primary);
    let spec = WavReader::open(&path).unwrap().spec();
    assert_eq!(spec.bits_per_sample, 32);
    assert_eq!(spec.sample_format, SampleFormat::Int);
    assert_eq!(spec.channels, 2);

    let err = save_audio(dir.path().join("direct.ogg"), &buffer, 44100, "PCM_16").unwrap_err();
    assert!(matches!(err, SaveError::BothBackendsFailed { .. }));
}
