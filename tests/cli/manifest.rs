use std::fs;
use std::process::Command;

fn setup() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let wavs = dir.path().join("wavs");
    fs::create_dir(&wavs).unwrap();
    fs::write(wavs.join("a.wav"), b"RIFF").unwrap();
    fs::write(wavs.join("c.wav"), b"RIFF").unwrap();
    fs::write(
        dir.path().join("metadata.csv"),
        "audio_path|text|speaker_id\na.wav|Hello|spk1\nb.wav||spk2\nc.wav|World|\n",
    )
    .unwrap();
    dir
}

#[test]
fn cli_manifest_reports_counts() {
    let dir = setup();
    let output = dir.path().join("out/vi_raw.jsonl");

    let result = Command::new(env!("CARGO_BIN_EXE_ttsprep"))
        .args([
            "manifest",
            "--csv",
            dir.path().join("metadata.csv").to_str().unwrap(),
            "--audio-root",
            dir.path().join("wavs").to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .output()
        .expect("run ttsprep manifest");

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Wrote 2 samples"), "{stdout}");
    assert!(stdout.contains("(skipped 1)"), "{stdout}");
    assert_eq!(fs::read_to_string(&output).unwrap().lines().count(), 2);
}

#[test]
fn cli_manifest_uses_language_from_config() {
    let dir = setup();
    let config = dir.path().join("config.yaml");
    fs::write(&config, "manifest:\n  language: en\n").unwrap();
    let output = dir.path().join("out.jsonl");

    let status = Command::new(env!("CARGO_BIN_EXE_ttsprep"))
        .args([
            "--config",
            config.to_str().unwrap(),
            "manifest",
            "--csv",
            dir.path().join("metadata.csv").to_str().unwrap(),
            "--audio-root",
            dir.path().join("wavs").to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .status()
        .expect("run ttsprep manifest");

    assert!(status.success());
    let first = fs::read_to_string(&output).unwrap();
    let record: serde_json::Value = serde_json::from_str(first.lines().next().unwrap()).unwrap();
    assert_eq!(record["language"], "en");
}

#[test]
fn cli_manifest_fails_on_missing_columns() {
    let dir = setup();
    fs::write(dir.path().join("metadata.csv"), "audio_path|text\na.wav|Hello\n").unwrap();

    let result = Command::new(env!("CARGO_BIN_EXE_ttsprep"))
        .args([
            "manifest",
            "--csv",
            dir.path().join("metadata.csv").to_str().unwrap(),
            "--audio-root",
            dir.path().join("wavs").to_str().unwrap(),
            "--output",
            dir.path().join("out.jsonl").to_str().unwrap(),
        ])
        .output()
        .expect("run ttsprep manifest");

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("speaker_id"), "{stderr}");
}
