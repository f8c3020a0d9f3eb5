use std::path::PathBuf;

use thiserror::Error;

/// Errors that may occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No usable config directory found.
    #[error("No suitable config directory found")]
    NoConfigDir,
    /// Failed to create the config directory.
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        /// Directory path that failed to create.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to read a config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        /// TOML file path.
        path: PathBuf,
        /// TOML parse error.
        source: toml::de::Error,
    },
    /// The gateway base address is not an absolute http(s) URL.
    #[error("Invalid gateway base URL {url:?}: {reason}")]
    InvalidBaseUrl {
        /// Offending value.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
    /// A training split outside `(0, 1)`.
    #[error("training.test_size must be between 0 and 1 (exclusive), got {0}")]
    InvalidTestSize(f64),
}
