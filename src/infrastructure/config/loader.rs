use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::paths::settings_file_path;
use super::AppConfig;

/// Load a YAML configuration file from disk
pub fn load_yaml<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)?;
    let config: T = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Parse YAML from string
pub fn parse_yaml<T: DeserializeOwned>(content: &str) -> anyhow::Result<T> {
    let config: T = serde_yaml::from_str(content)?;
    Ok(config)
}

/// Save a configuration to a YAML file
pub fn save_yaml<T: Serialize>(path: impl AsRef<Path>, config: &T) -> anyhow::Result<()> {
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Where the loaded settings came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Missing(PathBuf),
    Invalid { path: PathBuf, error: String },
}

impl ConfigSource {
    /// Report how the settings were resolved. Call once logging is up.
    pub fn log(&self) {
        match self {
            Self::File(path) => tracing::info!("Loaded settings from {:?}", path),
            Self::Missing(path) => {
                tracing::debug!("No settings file at {:?}, using defaults", path)
            }
            Self::Invalid { path, error } => {
                tracing::warn!("Failed to parse {:?}: {}, using defaults", path, error)
            }
        }
    }
}

/// Read settings.yaml from the user config directory without logging.
pub fn read_config() -> (AppConfig, ConfigSource) {
    read_config_from(&settings_file_path())
}

/// Returns default settings if the file doesn't exist or is invalid
pub fn read_config_from(path: &Path) -> (AppConfig, ConfigSource) {
    if !path.exists() {
        return (AppConfig::default(), ConfigSource::Missing(path.to_path_buf()));
    }

    match load_yaml::<AppConfig>(path) {
        Ok(config) => (config, ConfigSource::File(path.to_path_buf())),
        Err(e) => (
            AppConfig::default(),
            ConfigSource::Invalid {
                path: path.to_path_buf(),
                error: e.to_string(),
            },
        ),
    }
}

/// Load settings.yaml from the user config directory.
pub fn load_config() -> AppConfig {
    load_config_from(&settings_file_path())
}

pub fn load_config_from(path: &Path) -> AppConfig {
    let (config, source) = read_config_from(path);
    source.log();
    config
}
