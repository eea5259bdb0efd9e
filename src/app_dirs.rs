//! Filesystem locations for the player's config and logs.
//!
//! Everything lives under one `.minuet` folder in the OS config root. The
//! `MINUET_CONFIG_HOME` environment variable relocates that root for tests
//! and portable installs.

use std::path::PathBuf;

use directories::BaseDirs;
use thiserror::Error;

/// Name of the application directory under the config root.
pub const APP_DIR_NAME: &str = ".minuet";
/// Environment variable that relocates the config root.
pub const CONFIG_HOME_ENV: &str = "MINUET_CONFIG_HOME";

const LOGS_DIR_NAME: &str = "logs";

/// Errors that can occur while resolving or preparing application directories.
#[derive(Debug, Error)]
pub enum AppDirError {
    /// No suitable base config directory could be resolved.
    #[error("No suitable base config directory available for application files")]
    NoBaseDir,
    /// Failed to create the application directory.
    #[error("Failed to create application directory at {path}: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying io error.
        source: std::io::Error,
    },
}

/// The `.minuet` root, created on first use.
pub fn app_root_dir() -> Result<PathBuf, AppDirError> {
    ensure_dir(resolve_base()?.join(APP_DIR_NAME))
}

/// The log directory inside the root, created on first use.
pub fn logs_dir() -> Result<PathBuf, AppDirError> {
    ensure_dir(app_root_dir()?.join(LOGS_DIR_NAME))
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf, AppDirError> {
    match std::fs::create_dir_all(&path) {
        Ok(()) => Ok(path),
        Err(source) => Err(AppDirError::CreateDir { path, source }),
    }
}

fn resolve_base() -> Result<PathBuf, AppDirError> {
    #[cfg(test)]
    if let Some(path) = test_override() {
        return Ok(path);
    }
    if let Ok(home) = std::env::var(CONFIG_HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    BaseDirs::new()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(AppDirError::NoBaseDir)
}

#[cfg(test)]
static CONFIG_BASE_OVERRIDE: std::sync::Mutex<Option<PathBuf>> = std::sync::Mutex::new(None);

#[cfg(test)]
fn test_override() -> Option<PathBuf> {
    CONFIG_BASE_OVERRIDE
        .lock()
        .ok()
        .and_then(|guard| guard.clone())
}

/// Serializes tests that redirect the config base to a temp directory.
#[cfg(test)]
pub(crate) static CONFIG_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Redirects [`app_root_dir`] to a temp base for the guard's lifetime.
#[cfg(test)]
pub(crate) struct OverrideGuard;

#[cfg(test)]
impl OverrideGuard {
    pub(crate) fn set(path: PathBuf) -> Self {
        *CONFIG_BASE_OVERRIDE
            .lock()
            .expect("config base override mutex poisoned") = Some(path);
        Self
    }
}

#[cfg(test)]
impl Drop for OverrideGuard {
    fn drop(&mut self) {
        if let Ok(mut guard) = CONFIG_BASE_OVERRIDE.lock() {
            *guard = None;
        }
    }
}
