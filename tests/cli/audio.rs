use hound::{SampleFormat, WavReader};
use std::process::Command;
use ttsprep::{AudioBuffer, AudioPersistor};

fn write_input(dir: &std::path::Path) -> std::path::PathBuf {
    let input = dir.join("input.wav");
    let buffer = AudioBuffer::from_channels(vec![vec![0.0_f32, 0.25, -0.25, 0.5]]).unwrap();
    AudioPersistor::default()
        .save(&input, &buffer, 48000, "FLOAT")
        .expect("write input wav");
    input
}

#[test]
fn audio_write_reencodes_with_requested_subtype() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_input(dir.path());
    let output = dir.path().join("nested/output.wav");

    let result = Command::new(env!("CARGO_BIN_EXE_ttsprep"))
        .args([
            "audio",
            "write",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--subtype",
            "PCM_24",
        ])
        .output()
        .expect("run ttsprep audio write");

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("hound"), "{stdout}");
    let reader = WavReader::open(&output).unwrap();
    assert_eq!(reader.spec().bits_per_sample, 24);
    assert_eq!(reader.spec().sample_rate, 48000);
    assert_eq!(reader.duration(), 4);
}

#[test]
fn audio_write_without_primary_uses_fallback() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_input(dir.path());
    let output = dir.path().join("output.wav");

    let result = Command::new(env!("CARGO_BIN_EXE_ttsprep"))
        .args([
            "audio",
            "write",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--no-primary",
        ])
        .output()
        .expect("run ttsprep audio write");

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("riff-float"), "{stdout}");
    assert_eq!(WavReader::open(&output).unwrap().spec().sample_format, SampleFormat::Float);
}

#[test]
fn audio_info_prints_format() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_input(dir.path());

    let result = Command::new(env!("CARGO_BIN_EXE_ttsprep"))
        .args(["audio", "info", "--input", input.to_str().unwrap()])
        .output()
        .expect("run ttsprep audio info");

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("sample_rate: 48000"), "{stdout}");
    assert!(stdout.contains("frames: 4"), "{stdout}");
}
