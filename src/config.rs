//! Run configuration for the manifest builder and audio writer.
//!
//! Configurations are optional YAML files loaded with [`load_config`]. Every
//! field has a default, so an empty document is a valid configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::audio::backend::AudioBackends;
use crate::audio::subtype::DEFAULT_SUBTYPE;
use crate::manifest::{ManifestOptions, DEFAULT_DELIMITER, DEFAULT_LANGUAGE};

/// Errors raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Defaults for the `manifest` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestConfig {
    /// Column delimiter of the metadata table.
    pub delimiter: String,
    /// Language tag written into every record.
    pub language: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl ManifestConfig {
    /// Builder options with optional command-line overrides applied.
    pub fn options(&self, delimiter: Option<String>, language: Option<String>) -> ManifestOptions {
        ManifestOptions {
            delimiter: delimiter.unwrap_or_else(|| self.delimiter.clone()),
            language: language.unwrap_or_else(|| self.language.clone()),
        }
    }
}

/// Defaults for audio persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioConfig {
    /// Encoding subtype requested from the primary backend.
    pub subtype: String,
    /// Whether the hound backend may be used.
    pub primary_backend: bool,
    /// Whether the raw RIFF fallback may be used.
    pub secondary_backend: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            subtype: DEFAULT_SUBTYPE.to_string(),
            primary_backend: true,
            secondary_backend: true,
        }
    }
}

impl AudioConfig {
    /// Build the backend capability set described by this config.
    pub fn backends(&self) -> AudioBackends {
        let mut backends = AudioBackends::detect();
        if !self.primary_backend {
            backends = backends.without_primary();
        }
        if !self.secondary_backend {
            backends = backends.without_secondary();
        }
        backends
    }
}

/// Top-level configuration.
///
/// # Example YAML
///
/// ```yaml
/// manifest:
///   delimiter: "|"
///   language: vi
/// audio:
///   subtype: PCM_24
///   primary_backend: true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub manifest: ManifestConfig,
    pub audio: AudioConfig,
}

/// Load a configuration from a YAML file.
///
/// # Errors
///
/// Returns an error if the file doesn't exist or contains invalid YAML.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if data.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
