//! Configuration management.
//!
//! Persistent defaults for the picker live in a TOML file under the platform
//! config directory (`~/.config/commit-picker/config.toml` on Linux). Command-line
//! flags always win over the file.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during config operations
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("Unable to determine config directory")]
    ConfigDirNotFound,

    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse config file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Key given to `config set` / `config unset` is not a known setting
    #[error("Unknown config key: {0} (expected one of: {keys})", keys = CONFIG_KEYS.join(", "))]
    UnknownKey(String),

    /// Value given to `config set` does not fit the key
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    /// Generic error from anyhow
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Keys accepted by `config set` / `config unset`.
pub const CONFIG_KEYS: &[&str] = &["max_count", "full_hash"];

/// Configuration structure for persistent settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Upper bound on the number of commits loaded into the picker
    pub max_count: Option<usize>,

    /// Show full 40-character hashes instead of abbreviated ones
    pub full_hash: Option<bool>,
}

/// Effective settings after applying CLI flags over the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub max_count: Option<usize>,
    pub full_hash: bool,
}

impl Config {
    /// Resolve settings following priority: CLI flag → config file → default.
    pub fn resolve(&self, cli_max_count: Option<usize>, cli_full_hash: bool) -> Settings {
        Settings {
            max_count: cli_max_count.or(self.max_count),
            full_hash: cli_full_hash || self.full_hash.unwrap_or(false),
        }
    }

    /// Set a single key from its string form.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "max_count" => {
                self.max_count = Some(value.parse().map_err(|_| invalid_value(key, value))?);
            }
            "full_hash" => {
                self.full_hash = Some(value.parse().map_err(|_| invalid_value(key, value))?);
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Reset a single key to unset.
    pub fn unset_value(&mut self, key: &str) -> Result<(), ConfigError> {
        match key {
            "max_count" => self.max_count = None,
            "full_hash" => self.full_hash = None,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

fn invalid_value(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Get the path to the config file
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::ConfigDirNotFound)?;

    let app_config_dir = config_dir.join("commit-picker");
    Ok(app_config_dir.join("config.toml"))
}

/// Load configuration from the default file
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Load configuration from `config_path`; a missing or empty file yields defaults.
pub fn load_config_from(config_path: &Path) -> Result<Config, ConfigError> {
    if !config_path.exists() {
        debug!(path = %config_path.display(), "No config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(config_path)?;

    if content.trim().is_empty() {
        // Handle empty config file
        return Ok(Config::default());
    }

    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to `config_path`, creating parent directories as needed.
pub fn save_config_to(config_path: &Path, config: &Config) -> Result<(), ConfigError> {
    // Create parent directory if it doesn't exist
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(config)?;
    fs::write(config_path, content)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    Ok(())
}

/// Update a single config value
pub fn update_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    let path = config_file_path()?;
    let mut config = load_config_from(&path)?;
    config.set_value(key, value)?;
    save_config_to(&path, &config)
}

/// Delete a config value (set it to None)
pub fn delete_config_value(key: &str) -> Result<(), ConfigError> {
    let path = config_file_path()?;
    let mut config = load_config_from(&path)?;
    config.unset_value(key)?;
    save_config_to(&path, &config)
}
