//! Network abstraction
//!
//! Provides a trait for the network boundary so the router and the
//! lifecycle controller can run against a real HTTP client, an offline
//! stand-in, or a scripted fetcher in tests.

use crate::error::SwResult;
use crate::net::{Request, Response};
use async_trait::async_trait;

/// Abstract network interface
///
/// An HTTP error status is still a successful fetch; `Err` means the
/// network could not produce a response at all (offline, DNS failure,
/// timeout).
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Perform the request and buffer the full response
    async fn fetch(&self, request: &Request) -> SwResult<Response>;

    /// Get the human-readable fetcher name for display
    fn fetcher_name(&self) -> &'static str;
}
