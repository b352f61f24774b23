//! Route classification table
//!
//! An ordered list of (path prefix, class) pairs evaluated top to bottom;
//! the first match wins and anything unmatched is an asset.

use crate::config::schema::RoutesConfig;
use serde::Serialize;
use std::fmt;

/// How a request is served
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteClass {
    /// Authenticated application endpoint: network-first, never cached
    Api,
    /// Static asset or page: cache-first, populated on miss
    Asset,
}

impl RouteClass {
    /// Name of the fetch strategy applied to this class
    pub fn strategy_name(&self) -> &'static str {
        match self {
            Self::Api => "network-first",
            Self::Asset => "cache-first",
        }
    }
}

impl fmt::Display for RouteClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api => write!(f, "api"),
            Self::Asset => write!(f, "asset"),
        }
    }
}

/// A single table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub prefix: String,
    pub class: RouteClass,
}

/// Ordered prefix table
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from configuration: every prefix maps to `Api`
    pub fn from_config(config: &RoutesConfig) -> Self {
        config
            .api_prefixes
            .iter()
            .fold(Self::new(), |table, prefix| table.with_route(prefix, RouteClass::Api))
    }

    /// Append a row (builder style)
    pub fn with_route(mut self, prefix: &str, class: RouteClass) -> Self {
        self.routes.push(Route {
            prefix: prefix.to_string(),
            class,
        });
        self
    }

    /// Classify a URL path
    pub fn classify(&self, path: &str) -> RouteClass {
        self.routes
            .iter()
            .find(|route| path.starts_with(&route.prefix))
            .map(|route| route.class)
            .unwrap_or(RouteClass::Asset)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}
