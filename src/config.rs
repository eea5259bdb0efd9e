//! Persisted application configuration.
//!
//! Settings live in a TOML file under the `.minuet` app directory. Loading
//! falls back to defaults when the file is missing so first launch needs no
//! setup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;
use crate::session::VolumeParam;

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application settings carried across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Master volume (0.0-1.0) restored on startup.
    #[serde(default = "default_volume")]
    pub volume: f32,
    /// Directory the open-file dialog starts in.
    #[serde(default)]
    pub last_open_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            volume: VolumeParam::DEFAULT,
            last_open_dir: None,
        }
    }
}

fn default_volume() -> f32 {
    VolumeParam::DEFAULT
}

/// Errors that can occur while loading or saving the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No suitable base config directory could be resolved.
    #[error("No suitable base config directory available")]
    NoBaseDir,
    /// Failed to create the config directory.
    #[error("Failed to create config directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying io error.
        source: std::io::Error,
    },
    /// Failed to read the config file.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying io error.
        source: std::io::Error,
    },
    /// Failed to write the config file.
    #[error("Failed to write config file {path}: {source}")]
    Write {
        /// File that could not be written.
        path: PathBuf,
        /// Underlying io error.
        source: std::io::Error,
    },
    /// The config file contents are not valid TOML for [`AppConfig`].
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        /// File that could not be parsed.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
    /// The configuration could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
}

/// Resolve the configuration file path, ensuring the app directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load configuration from disk, returning defaults if the file is missing.
pub fn load_or_default() -> Result<AppConfig, ConfigError> {
    load_from_path(&config_path()?)
}

/// Load configuration from `path`, returning defaults if it does not exist.
pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Persist configuration to disk, overwriting any previous contents.
pub fn save(config: &AppConfig) -> Result<(), ConfigError> {
    save_to_path(config, &config_path()?)
}

/// Save configuration to a specific path, creating parent directories.
pub fn save_to_path(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;
    std::fs::write(path, contents).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoBaseDir,
        app_dirs::AppDirError::CreateDir { path, source } => ConfigError::CreateDir { path, source },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = load_from_path(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.volume, VolumeParam::DEFAULT);
    }

    #[test]
    fn round_trips_through_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = AppConfig {
            volume: 0.8,
            last_open_dir: Some(PathBuf::from("/music")),
        };
        save_to_path(&config, &path).unwrap();
        let loaded = load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "volume = \"loud\"").unwrap();
        let err = load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn save_uses_app_dir_root() {
        let _lock = app_dirs::CONFIG_TEST_LOCK.lock().unwrap();
        let base = tempdir().unwrap();
        let _guard = app_dirs::OverrideGuard::set(base.path().to_path_buf());
        save(&AppConfig::default()).unwrap();
        let loaded = load_or_default().unwrap();
        assert_eq!(loaded, AppConfig::default());
        assert!(
            base.path()
                .join(app_dirs::APP_DIR_NAME)
                .join(CONFIG_FILE_NAME)
                .is_file()
        );
    }
}
