//! Fetcher that simulates a disconnected device

use crate::error::{SwError, SwResult};
use crate::net::{Fetcher, Request, Response};
use async_trait::async_trait;
use tracing::debug;

/// Every request fails as if the network were down
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineFetcher;

#[async_trait]
impl Fetcher for OfflineFetcher {
    async fn fetch(&self, request: &Request) -> SwResult<Response> {
        debug!("offline: refusing {} {}", request.method(), request.url());
        Err(SwError::network(
            request.url().as_str(),
            "network unavailable (offline)",
        ))
    }

    fn fetcher_name(&self) -> &'static str {
        "offline"
    }
}
