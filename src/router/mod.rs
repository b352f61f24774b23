//! Request routing
//!
//! Every intercepted request is classified against the route table and
//! served with the matching strategy:
//! - api: network-first with an offline JSON fallback, never cached
//! - asset: cache-first against the active generation's store, populated on miss
//!
//! Before any generation is active nothing controls the page, so assets
//! go straight to the network and no store is touched.

mod routes;
mod strategy;

pub use routes::{Route, RouteClass, RouteTable};
pub use strategy::{cache_first, network_first, offline_response, ResponseSource};

use crate::cache::{Cache, CacheStorage};
use crate::config::Config;
use crate::error::SwResult;
use crate::net::{Fetcher, Request, Response};
use std::sync::Arc;
use tracing::debug;

/// Outcome of routing one request
#[derive(Debug, Clone)]
pub struct Routed {
    pub response: Response,
    pub class: RouteClass,
    pub source: ResponseSource,
}

/// Per-request routing policy
///
/// Clone is cheap; storage and fetcher are shared.
#[derive(Clone)]
pub struct Router {
    routes: RouteTable,
    offline_message: String,
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
}

impl Router {
    pub fn new(config: &Config, storage: Arc<dyn CacheStorage>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            routes: RouteTable::from_config(&config.routes),
            offline_message: config.worker.offline_message.clone(),
            storage,
            fetcher,
        }
    }

    /// Replace the route table
    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Classify a request; recomputed on every call
    pub fn classify(&self, request: &Request) -> RouteClass {
        self.routes.classify(request.path())
    }

    /// Produce the response for an intercepted request
    ///
    /// `store` names the active generation's cache store; `None` means no
    /// generation is active yet. Only an asset miss with the network down
    /// returns `Err`.
    pub async fn handle_fetch(&self, store: Option<&str>, request: &Request) -> SwResult<Routed> {
        let class = self.classify(request);
        debug!(
            "{} {} -> {} ({}, store {})",
            request.method(),
            request.url(),
            class,
            class.strategy_name(),
            store.unwrap_or("none")
        );

        let (response, source) = match class {
            RouteClass::Api => {
                network_first(&*self.fetcher, request, &self.offline_message).await?
            }
            RouteClass::Asset => match store {
                Some(store) => {
                    let cache = Cache::open(self.storage.clone(), store).await?;
                    cache_first(&cache, &*self.fetcher, request).await?
                }
                None => (self.fetcher.fetch(request).await?, ResponseSource::Network),
            },
        };

        Ok(Routed {
            response,
            class,
            source,
        })
    }
}
