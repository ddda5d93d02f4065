//! Shared helpers for building metadata fixtures on disk.

#![allow(dead_code)]

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary dataset layout: `wavs/` audio root plus a metadata table.
pub struct Dataset {
    pub dir: TempDir,
}

impl Dataset {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("wavs")).expect("create wavs dir");
        Self { dir }
    }

    pub fn audio_root(&self) -> PathBuf {
        self.dir.path().join("wavs")
    }

    pub fn csv_path(&self) -> PathBuf {
        self.dir.path().join("metadata.csv")
    }

    pub fn output_path(&self) -> PathBuf {
        self.dir.path().join("manifests").join("out.jsonl")
    }

    /// Create placeholder audio files under the audio root.
    pub fn touch_audio(&self, names: &[&str]) {
        for name in names {
            let path = self.audio_root().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create audio subdir");
            }
            fs::write(&path, b"RIFF").expect("write audio placeholder");
        }
    }

    pub fn write_table(&self, contents: &str) {
        fs::write(self.csv_path(), contents).expect("write metadata table");
    }
}

/// Parse every line of a JSONL file.
pub fn read_manifest(path: &Path) -> Vec<Value> {
    let data = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read manifest {}: {e}", path.display()));
    data.lines()
        .map(|line| {
            serde_json::from_str(line).unwrap_or_else(|e| panic!("bad manifest line {line}: {e}"))
        })
        .collect()
}

/// A short stereo ramp used by audio tests.
pub fn stereo_samples(len: usize) -> Vec<Vec<f32>> {
    let left = (0..len).map(|i| (i as f32 / len as f32) - 0.5).collect();
    let right = (0..len).map(|i| 0.5 - (i as f32 / len as f32)).collect();
    vec![left, right]
}
