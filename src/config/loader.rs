use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/toppings/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("toppings").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        tracing::info!(
            path = %path.display(),
            strategy = %config.defaults.strategy,
            "config loaded"
        );
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The catalog path, if any, names a `.toml` or `.json` file
    /// - Initial selection names are not blank
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.catalog.path {
            let supported = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    ext.eq_ignore_ascii_case("toml") || ext.eq_ignore_ascii_case("json")
                });
            if !supported {
                return Err(ConfigError::ValidationError {
                    message: format!(
                        "Catalog '{}' must be a .toml or .json file",
                        path.display()
                    ),
                });
            }
        }

        if self.defaults.initial_selection.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::ValidationError {
                message: "Initial selection contains an empty topping name".to_string(),
            });
        }

        Ok(())
    }
}
