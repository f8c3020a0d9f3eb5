//! Application settings loaded from `habitat.toml`.
//!
//! Every field has a default so a missing or partial file still yields a
//! usable configuration. `HABITAT_API_URL` overrides the gateway address.

mod errors;
mod load;

use serde::{Deserialize, Serialize};

pub use errors::ConfigError;
pub use load::{
    API_URL_ENV, CONFIG_FILE_NAME, apply_overrides, config_path, load_or_default,
    load_settings_from,
};

/// Default address of the prediction service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Top-level settings.
///
/// Config sections: `gateway`, `training`, `logging`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub training: TrainingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Check cross-field constraints and normalize the base URL.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.gateway.base_url = normalize_base_url(&self.gateway.base_url)?;
        let test_size = self.training.test_size;
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(ConfigError::InvalidTestSize(test_size));
        }
        Ok(self)
    }
}

/// Connection settings for the prediction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    /// Base address every endpoint path is appended to.
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub write_timeout_secs: u64,
    /// Largest accepted response body.
    pub max_response_bytes: usize,
    /// Attempts for idempotent reads (status, influence); training is never retried.
    pub read_attempts: usize,
    pub backoff_base_ms: u64,
    pub backoff_max_ms: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: 10,
            read_timeout_secs: 30,
            write_timeout_secs: 30,
            max_response_bytes: 1024 * 1024,
            read_attempts: 2,
            backoff_base_ms: 250,
            backoff_max_ms: 2_000,
        }
    }
}

/// Parameters forwarded with every training request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingSettings {
    pub test_size: f64,
    pub random_state: u64,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            random_state: 42,
        }
    }
}

/// Tracing output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when `HABITAT_LOG` is unset.
    pub filter: String,
    /// Also write a per-launch log file under the app directory.
    pub log_to_file: bool,
    pub max_log_files: usize,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            log_to_file: false,
            max_log_files: 10,
        }
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let parsed = url::Url::parse(trimmed).map_err(|err| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {}", parsed.scheme()),
        });
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
