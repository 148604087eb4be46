use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration from jot.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data file, relative to the working directory unless absolute
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Keep dropped lines and failed saves in `<path>.recovery.log`
    #[serde(default = "default_true")]
    pub recovery_log: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            path: default_data_path(),
            recovery_log: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
        }
    }
}

pub fn default_data_path() -> PathBuf {
    PathBuf::from("data").join("tasks.txt")
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}
