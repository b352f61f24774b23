//! Network boundary
//!
//! Requests and responses as the worker sees them, plus the fetchers that
//! reach (or pretend to reach) the network:
//! - `HttpFetcher`: real HTTP via `ureq`
//! - `OfflineFetcher`: every request fails, for offline simulation

mod factory;
mod fetcher;
mod headers;
mod http;
mod offline;
mod request;
mod response;

pub use factory::{create_fetcher, NetworkMode};
pub use fetcher::Fetcher;
pub use headers::Headers;
pub use http::HttpFetcher;
pub use offline::OfflineFetcher;
pub use request::Request;
pub use response::{reason_phrase, Response, ResponseType};
