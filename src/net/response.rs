//! Response representation shared by the network, the cache and the router

use crate::error::SwResult;
use crate::net::Headers;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use url::Url;

/// Response tainting, as the page would observe it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Same-origin response
    Basic,
    /// Cross-origin response with CORS
    Cors,
    /// Cross-origin response without CORS; status and body hidden
    Opaque,
    /// Network error placeholder
    Error,
    /// Constructed locally
    Default,
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Basic => "basic",
            Self::Cors => "cors",
            Self::Opaque => "opaque",
            Self::Error => "error",
            Self::Default => "default",
        };
        write!(f, "{}", name)
    }
}

/// A full response with its body buffered
///
/// `Clone` yields an independent copy of the body, which is what the
/// cache stores while the original goes back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub status_text: String,
    pub headers: Headers,
    pub body: Vec<u8>,
    pub response_type: ResponseType,
    pub url: Option<Url>,
}

impl Response {
    /// Create an empty response with the canonical reason phrase
    pub fn new(status: u16) -> Self {
        Self {
            status,
            status_text: reason_phrase(status).to_string(),
            headers: Headers::new(),
            body: Vec::new(),
            response_type: ResponseType::Default,
            url: None,
        }
    }

    /// Create a JSON response
    pub fn json(status: u16, value: &serde_json::Value) -> SwResult<Self> {
        let mut response = Self::new(status);
        response.body = serde_json::to_vec(value)?;
        response.headers.insert("content-type", "application/json");
        Ok(response)
    }

    /// Builder helper for a header
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Builder helper for the body
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    /// Status in the 200-299 range
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Eligible for opportunistic caching: exactly 200 and same-origin
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.response_type == ResponseType::Basic
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type")
    }

    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Decode the body as JSON
    pub fn json_body<T: DeserializeOwned>(&self) -> SwResult<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Canonical reason phrase for a status code
pub fn reason_phrase(status: u16) -> &'static str {
    ureq::http::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("")
}
