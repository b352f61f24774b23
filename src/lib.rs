//! ponto-sw - Offline worker for the Ponto Eletrônico web app
//!
//! Intercepts the page's requests, serves static assets from a versioned
//! cache store and sends API calls network-first with an offline fallback.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod net;
pub mod router;
pub mod ui;
pub mod worker;

pub use error::{SwError, SwResult};
