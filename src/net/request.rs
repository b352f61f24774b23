//! Intercepted request representation

use crate::error::{SwError, SwResult};
use crate::net::Headers;
use url::Url;

/// A request issued by a controlled page
#[derive(Debug, Clone)]
pub struct Request {
    method: String,
    url: Url,
    headers: Headers,
    body: Option<Vec<u8>>,
}

impl Request {
    /// Create a request with an explicit method
    pub fn new(method: &str, url: Url) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            url,
            headers: Headers::new(),
            body: None,
        }
    }

    /// Create a GET request
    pub fn get(url: Url) -> Self {
        Self::new("GET", url)
    }

    /// Resolve a path or absolute URL against the worker origin
    pub fn resolve(input: &str, origin: &Url) -> SwResult<Url> {
        let parsed = match Url::parse(input) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => origin.join(input).map_err(|e| {
                SwError::InvalidUrl {
                    input: input.to_string(),
                    reason: e.to_string(),
                }
            })?,
            Err(e) => {
                return Err(SwError::InvalidUrl {
                    input: input.to_string(),
                    reason: e.to_string(),
                })
            }
        };

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SwError::InvalidUrl {
                input: input.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(parsed)
    }

    /// Add a header (builder style)
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Attach a request body (builder style)
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Only GET requests may be stored in a cache
    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }

    /// Whether the request targets the given origin
    pub fn is_same_origin(&self, origin: &Url) -> bool {
        self.url.origin() == origin.origin()
    }
}
