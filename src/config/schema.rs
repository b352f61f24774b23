//! Configuration schema for ponto-sw
//!
//! Configuration is stored at `~/.config/ponto-sw/config.toml`

use crate::error::{SwError, SwResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Worker identity and promotion behaviour
    pub worker: WorkerConfig,

    /// Assets pre-populated on install
    pub seed: SeedConfig,

    /// Request classification table
    pub routes: RoutesConfig,

    /// Network client settings
    pub network: NetworkConfig,

    /// Durable storage settings
    pub storage: StorageConfig,
}

impl Config {
    /// Check values that serde cannot validate on its own
    pub fn validate(&self) -> SwResult<()> {
        if self.worker.version.trim().is_empty() {
            return Err(SwError::ConfigValue {
                key: "worker.version".to_string(),
                reason: "version tag must not be empty".to_string(),
            });
        }

        self.worker.origin_url()?;

        for prefix in &self.routes.api_prefixes {
            if !prefix.starts_with('/') {
                return Err(SwError::ConfigValue {
                    key: "routes.api_prefixes".to_string(),
                    reason: format!("prefix '{}' must start with '/'", prefix),
                });
            }
        }

        if self.network.timeout_secs == 0 {
            return Err(SwError::ConfigValue {
                key: "network.timeout_secs".to_string(),
                reason: "timeout must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Worker identity and promotion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Version tag naming the current cache generation
    pub version: String,

    /// Origin the worker is registered for; same-origin responses are cacheable
    pub origin: String,

    /// Promote to active as soon as install completes
    pub skip_waiting: bool,

    /// Message returned in the offline JSON fallback for API routes
    pub offline_message: String,
}

impl WorkerConfig {
    /// Parse the configured origin
    pub fn origin_url(&self) -> SwResult<Url> {
        let url = Url::parse(&self.origin).map_err(|e| SwError::ConfigValue {
            key: "worker.origin".to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(SwError::ConfigValue {
                key: "worker.origin".to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        Ok(url)
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            version: "v1".to_string(),
            origin: "http://localhost:8000".to_string(),
            skip_waiting: true,
            offline_message: "Offline - Conecte-se à internet".to_string(),
        }
    }
}

/// How install treats a seed asset that cannot be fetched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedPolicy {
    /// Log the failure and keep the partially seeded store
    #[default]
    BestEffort,
    /// Fail the install and drop the store
    Atomic,
}

impl fmt::Display for SeedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BestEffort => write!(f, "best-effort"),
            Self::Atomic => write!(f, "atomic"),
        }
    }
}

/// Seed asset settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Paths or absolute URLs stored at install time, in order
    pub assets: Vec<String>,

    /// Failure handling during seeding
    pub policy: SeedPolicy,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            assets: vec![
                "/".to_string(),
                "/login".to_string(),
                "/cadastro".to_string(),
                "/dashboard".to_string(),
                "/admin".to_string(),
                "/static/css/style.css".to_string(),
                "/static/js/app.js".to_string(),
                "/static/manifest.json".to_string(),
            ],
            policy: SeedPolicy::BestEffort,
        }
    }
}

/// Route classification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Path prefixes served network-first and never cached
    pub api_prefixes: Vec<String>,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            api_prefixes: vec![
                "/auth/".to_string(),
                "/ponto/".to_string(),
                "/admin/".to_string(),
                "/api/".to_string(),
            ],
        }
    }
}

/// Network client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,

    /// Largest response body accepted, in bytes
    pub max_body_bytes: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Override for the state directory holding caches and registration
    pub state_dir: Option<PathBuf>,
}
