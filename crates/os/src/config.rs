use std::fs;
use std::num::NonZeroU8;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Shell settings. Every field has a default, so a config file only needs the
/// keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Priority given to every launched program.
    pub default_priority: NonZeroU8,
    /// Passes to run before giving up on programs that never finish.
    pub max_passes: u64,
    /// Largest memory region a program may request.
    pub max_image_len: u64,
    /// Trace every executed instruction.
    pub trace: bool,
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_priority: NonZeroU8::MIN,
            max_passes: 1_000_000,
            max_image_len: loader::LoadConfig::default().max_image_len,
            trace: false,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn load_config(&self) -> loader::LoadConfig {
        loader::LoadConfig {
            max_image_len: self.max_image_len,
        }
    }
}
