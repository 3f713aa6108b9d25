// TOML config adapter - Configuration loading from TOML files

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{debug, info};

use crate::config::{Config, APP_NAME};
use crate::domain::errors::*;

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Platform config file path
    ///
    /// - Linux: `~/.config/dylt/config.toml`
    /// - macOS: `~/Library/Application Support/dylt/config.toml`
    /// - Windows: `%APPDATA%\dylt\config\config.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the platform default is used
    /// when present and built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> DomainResult<Config> {
        let config = match explicit {
            Some(path) => Self::load_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::load_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Config::default()
                }
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Read and parse one file
    pub fn load_file(path: &Path) -> DomainResult<Config> {
        info!("Loading configuration from: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        Self::parse(&content)
            .map_err(|e| DomainError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Parse TOML content into a config, filling gaps with defaults
    pub fn parse(content: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(content)
    }

    /// Render a config as TOML
    pub fn render(config: &Config) -> DomainResult<String> {
        toml::to_string_pretty(config)
            .map_err(|e| DomainError::Config(format!("failed to serialize config: {}", e)))
    }
}
