//! Fetcher factory
//!
//! Picks the network implementation for the current invocation.

use crate::config::Config;
use crate::error::SwResult;
use crate::net::{Fetcher, HttpFetcher, OfflineFetcher};
use std::sync::Arc;

/// Network mode requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkMode {
    /// Real HTTP requests to the configured origin
    Online,
    /// All requests fail with a network error
    Offline,
}

impl NetworkMode {
    pub fn from_offline_flag(offline: bool) -> Self {
        if offline {
            Self::Offline
        } else {
            Self::Online
        }
    }
}

/// Create a fetcher for the given mode
pub fn create_fetcher(config: &Config, mode: NetworkMode) -> SwResult<Arc<dyn Fetcher>> {
    match mode {
        NetworkMode::Online => {
            let origin = config.worker.origin_url()?;
            Ok(Arc::new(HttpFetcher::new(origin, &config.network)))
        }
        NetworkMode::Offline => Ok(Arc::new(OfflineFetcher)),
    }
}
