//! Where `habitat.toml` and the log files live.
//!
//! Everything sits in one `.habitat` folder under the OS config directory,
//! or under `HABITAT_CONFIG_HOME` when that is set.

use std::ffi::OsString;
use std::path::PathBuf;

use directories::BaseDirs;
use thiserror::Error;

pub const APP_DIR_NAME: &str = ".habitat";
/// Replaces the OS config directory as the parent of [`APP_DIR_NAME`].
pub const CONFIG_HOME_ENV: &str = "HABITAT_CONFIG_HOME";

const LOGS_DIR_NAME: &str = "logs";

#[derive(Debug, Error)]
pub enum AppDirError {
    #[error("Neither HABITAT_CONFIG_HOME nor an OS config directory is available")]
    NoBaseDir,
    #[error("Failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The `.habitat` folder, created on first use.
pub fn app_root_dir() -> Result<PathBuf, AppDirError> {
    let parent = parent_dir(|name| std::env::var_os(name)).ok_or(AppDirError::NoBaseDir)?;
    create(parent.join(APP_DIR_NAME))
}

/// The `logs` folder inside [`app_root_dir`].
pub fn logs_dir() -> Result<PathBuf, AppDirError> {
    create(app_root_dir()?.join(LOGS_DIR_NAME))
}

/// An empty `HABITAT_CONFIG_HOME` counts as unset.
fn parent_dir(lookup: impl Fn(&str) -> Option<OsString>) -> Option<PathBuf> {
    match lookup(CONFIG_HOME_ENV).filter(|home| !home.is_empty()) {
        Some(home) => Some(PathBuf::from(home)),
        None => BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf()),
    }
}

fn create(path: PathBuf) -> Result<PathBuf, AppDirError> {
    match std::fs::create_dir_all(&path) {
        Ok(()) => Ok(path),
        Err(source) => Err(AppDirError::CreateDir { path, source }),
    }
}
