//! Configuration management for ponto-sw

pub mod schema;

pub use schema::{Config, SeedPolicy};

use crate::error::{SwError, SwResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Environment variable overriding the state directory
pub const STATE_DIR_ENV: &str = "PONTO_SW_STATE_DIR";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ponto-sw")
            .join("config.toml")
    }

    /// Get the default state directory path
    pub fn default_state_dir() -> PathBuf {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ponto-sw")
    }

    /// Resolve the state directory: config override, then environment, then default
    pub fn state_dir(config: &Config) -> PathBuf {
        if let Some(ref dir) = config.storage.state_dir {
            return dir.clone();
        }
        match std::env::var_os(STATE_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => Self::default_state_dir(),
        }
    }

    /// Directory holding one subdirectory per cache store
    pub fn caches_dir(config: &Config) -> PathBuf {
        Self::state_dir(config).join("caches")
    }

    /// Path of the persisted worker registration
    pub fn registration_path(config: &Config) -> PathBuf {
        Self::state_dir(config).join("registration.json")
    }

    /// Load configuration, using defaults if the file does not exist
    pub async fn load(&self) -> SwResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> SwResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| SwError::io(format!("reading config from {}", path.display()), e))?;

        let config: Config = toml::from_str(&content).map_err(|e| SwError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> SwResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            SwError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> SwResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| SwError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Ensure the state directories exist
    pub async fn ensure_state_dirs(config: &Config) -> SwResult<()> {
        let dirs = [Self::state_dir(config), Self::caches_dir(config)];

        for dir in &dirs {
            fs::create_dir_all(dir).await.map_err(|e| {
                SwError::io(format!("creating directory {}", dir.display()), e)
            })?;
        }

        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
