//! Cache keys and stored entries

use crate::net::{Headers, Request, Response, ResponseType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Identity of a cached request: method plus URL without fragment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    method: String,
    url: String,
}

impl CacheKey {
    /// Derive the key for a request
    pub fn for_request(request: &Request) -> Self {
        let mut url = request.url().clone();
        url.set_fragment(None);
        Self {
            method: request.method().to_string(),
            url: url.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// SHA256 of the key, first 32 hex chars; used as the on-disk file stem
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.method.as_bytes());
        hasher.update(b" ");
        hasher.update(self.url.as_bytes());
        hex::encode(&hasher.finalize()[..16])
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Request header values captured for the response's `Vary` header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarySnapshot {
    /// `Vary: *` - the entry never matches a later request
    pub any: bool,
    /// Header name (lowercase) and the value the original request carried
    pub headers: Vec<(String, Option<String>)>,
}

impl VarySnapshot {
    /// Capture the request values named by the response's `Vary` header
    pub fn capture(request: &Request, response: &Response) -> Self {
        let mut snapshot = Self::default();
        let Some(vary) = response.headers.get("vary") else {
            return snapshot;
        };

        for name in vary.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            if name == "*" {
                snapshot.any = true;
                continue;
            }
            let name = name.to_ascii_lowercase();
            let value = request.headers().get(&name).map(str::to_string);
            snapshot.headers.push((name, value));
        }
        snapshot
    }

    /// Whether a new request carries the same varying header values
    pub fn matches(&self, request: &Request) -> bool {
        if self.any {
            return false;
        }
        self.headers
            .iter()
            .all(|(name, value)| request.headers().get(name) == value.as_deref())
    }
}

/// A response captured in a cache store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedEntry {
    /// Display form of the cache key ("GET http://...")
    pub key: String,
    pub method: String,
    pub url: String,
    pub status: u16,
    pub status_text: String,
    pub headers: Headers,
    pub response_type: ResponseType,
    pub vary: VarySnapshot,
    #[serde(with = "hex_body")]
    pub body: Vec<u8>,
    pub cached_at: DateTime<Utc>,
}

impl CachedEntry {
    /// Capture a response for a request; the response is consumed, so callers
    /// that still need it must hand over a clone
    pub fn capture(request: &Request, response: Response) -> Self {
        let key = CacheKey::for_request(request);
        let vary = VarySnapshot::capture(request, &response);
        Self {
            key: key.to_string(),
            method: request.method().to_string(),
            url: key.url().to_string(),
            status: response.status,
            status_text: response.status_text,
            headers: response.headers,
            response_type: response.response_type,
            vary,
            body: response.body,
            cached_at: Utc::now(),
        }
    }

    /// Whether this entry answers the request
    pub fn matches(&self, request: &Request) -> bool {
        self.key == CacheKey::for_request(request).to_string() && self.vary.matches(request)
    }

    /// Rebuild a response from the stored copy
    pub fn to_response(&self) -> Response {
        Response {
            status: self.status,
            status_text: self.status_text.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
            response_type: self.response_type,
            url: url::Url::parse(&self.url).ok(),
        }
    }
}

mod hex_body {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(body: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(body))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        hex::decode(encoded).map_err(serde::de::Error::custom)
    }
}
