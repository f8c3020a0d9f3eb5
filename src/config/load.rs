use std::path::{Path, PathBuf};

use serde::de::Error as SerdeDeError;

use crate::app_dirs;

use super::{ConfigError, Settings};

/// Name of the settings file inside the app directory.
pub const CONFIG_FILE_NAME: &str = "habitat.toml";
/// Environment variable overriding `gateway.base_url`.
pub const API_URL_ENV: &str = "HABITAT_API_URL";

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load settings from disk, returning defaults if the file is missing.
///
/// Environment overrides are applied before validation.
pub fn load_or_default() -> Result<Settings, ConfigError> {
    let path = config_path()?;
    let settings = load_settings_from(&path)?;
    apply_overrides(settings, |name| std::env::var(name).ok()).validated()
}

/// Parse one settings file; a missing file yields defaults.
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source: SerdeDeError::custom(source),
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_overrides(
    mut settings: Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Settings {
    if let Some(url) = lookup(API_URL_ENV).filter(|url| !url.trim().is_empty()) {
        tracing::debug!("Gateway base URL overridden by {API_URL_ENV}");
        settings.gateway.base_url = url;
    }
    settings
}

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            ConfigError::CreateDir { path, source }
        }
    }
}
