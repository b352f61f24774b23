//! Error types for ponto-sw
//!
//! All modules use `SwResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for worker operations
pub type SwResult<T> = Result<T, SwError>;

/// All errors that can occur in the worker
#[derive(Error, Debug)]
pub enum SwError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigValue { key: String, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Network errors
    #[error("Network request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("Invalid URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },

    // Cache errors
    #[error("Cache store {name} error: {reason}")]
    CacheStore { name: String, reason: String },

    #[error("Cache store not found: {0}")]
    StoreNotFound(String),

    // Lifecycle errors
    #[error("No waiting worker to activate")]
    NothingToActivate,

    #[error("Install of {tag} failed: {} seed asset(s) could not be stored", failed.len())]
    SeedFailed { tag: String, failed: Vec<String> },

    #[error("Failed to persist worker registration: {0}")]
    StatePersist(String),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SwError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a network error for a URL
    pub fn network(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a cache store error
    pub fn cache(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CacheStore {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error means the network could not be reached at all
    pub fn is_offline(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NothingToActivate => Some("Run: ponto-sw install"),
            Self::SeedFailed { .. } => {
                Some("Check the seed list or set seed.policy = \"best-effort\"")
            }
            Self::ConfigInvalid { .. } => Some("Run: ponto-sw config init --force"),
            Self::Network { .. } => Some("Check connectivity or the worker.origin setting"),
            _ => None,
        }
    }
}
