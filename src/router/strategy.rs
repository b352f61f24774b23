//! Fetch strategies

use crate::cache::Cache;
use crate::error::SwResult;
use crate::net::{Fetcher, Request, Response};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use tracing::{debug, warn};

/// Where a routed response came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Network,
    Cache,
    /// Synthesized offline response
    Fallback,
}

impl fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Cache => write!(f, "cache"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// The JSON answer given to API calls when the network is unreachable
pub fn offline_response(message: &str) -> SwResult<Response> {
    Response::json(200, &json!({ "error": message }))
}

/// Network-first: the live response verbatim, or the offline JSON on failure.
/// Nothing is ever written to a cache.
pub async fn network_first(
    fetcher: &dyn Fetcher,
    request: &Request,
    offline_message: &str,
) -> SwResult<(Response, ResponseSource)> {
    match fetcher.fetch(request).await {
        Ok(response) => Ok((response, ResponseSource::Network)),
        Err(e) => {
            warn!(
                "{} {} unreachable, answering offline: {}",
                request.method(),
                request.url(),
                e
            );
            Ok((offline_response(offline_message)?, ResponseSource::Fallback))
        }
    }
}

/// Cache-first with population on miss.
///
/// A network failure on a miss propagates to the caller. Only a 200
/// same-origin response is stored, and the store receives a clone so the
/// caller's copy stays untouched.
pub async fn cache_first(
    cache: &Cache,
    fetcher: &dyn Fetcher,
    request: &Request,
) -> SwResult<(Response, ResponseSource)> {
    if !request.is_get() {
        debug!("{} {} bypasses the cache", request.method(), request.url());
        return Ok((fetcher.fetch(request).await?, ResponseSource::Network));
    }

    match cache.match_request(request).await {
        Ok(Some(cached)) => {
            debug!("cache hit in {}: {}", cache.name(), request.url());
            return Ok((cached, ResponseSource::Cache));
        }
        Ok(None) => debug!("cache miss in {}: {}", cache.name(), request.url()),
        Err(e) => warn!("cache lookup failed for {}: {}", request.url(), e),
    }

    let response = fetcher.fetch(request).await?;

    if response.is_cacheable() {
        if let Err(e) = cache.put(request, response.clone()).await {
            warn!("could not store {} in {}: {}", request.url(), cache.name(), e);
        }
    } else {
        debug!(
            "not caching {} (status {}, type {})",
            request.url(),
            response.status,
            response.response_type
        );
    }

    Ok((response, ResponseSource::Network))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheStorage;
    use crate::net::testing::ScriptedFetcher;
    use crate::net::ResponseType;
    use std::sync::Arc;

    fn request(fetcher: &ScriptedFetcher, path: &str) -> Request {
        Request::get(fetcher.origin().join(path).unwrap())
    }

    async fn cache() -> Cache {
        Cache::open(Arc::new(MemoryCacheStorage::new()), "v1")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn network_first_returns_live_response() {
        let fetcher = ScriptedFetcher::new();
        fetcher.respond_text("/auth/me", "{\"nome\":\"Ana\"}");

        let (response, source) = network_first(&fetcher, &request(&fetcher, "/auth/me"), "off")
            .await
            .unwrap();
        assert_eq!(source, ResponseSource::Network);
        assert_eq!(response.text(), "{\"nome\":\"Ana\"}");
    }

    #[tokio::test]
    async fn network_first_passes_error_statuses_through() {
        let fetcher = ScriptedFetcher::new();
        fetcher.respond("/auth/me", Response::new(401));

        let (response, source) = network_first(&fetcher, &request(&fetcher, "/auth/me"), "off")
            .await
            .unwrap();
        assert_eq!(source, ResponseSource::Network);
        assert_eq!(response.status, 401);
    }

    #[tokio::test]
    async fn network_first_falls_back_offline() {
        let fetcher = ScriptedFetcher::new();
        fetcher.set_online(false);

        let (response, source) =
            network_first(&fetcher, &request(&fetcher, "/auth/logout"), "sem rede")
                .await
                .unwrap();
        assert_eq!(source, ResponseSource::Fallback);
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type(), Some("application/json"));
        let body: serde_json::Value = response.json_body().unwrap();
        assert_eq!(body, json!({"error": "sem rede"}));
    }

    #[tokio::test]
    async fn cache_first_populates_then_short_circuits() {
        let fetcher = ScriptedFetcher::new();
        fetcher.respond_text("/static/css/style.css", "body{}");
        let cache = cache().await;
        let req = request(&fetcher, "/static/css/style.css");

        let (_, first) = cache_first(&cache, &fetcher, &req).await.unwrap();
        assert_eq!(first, ResponseSource::Network);

        fetcher.set_online(false);
        let (response, second) = cache_first(&cache, &fetcher, &req).await.unwrap();
        assert_eq!(second, ResponseSource::Cache);
        assert_eq!(response.text(), "body{}");
        assert_eq!(fetcher.calls_to("/static/css/style.css"), 1);
    }

    #[tokio::test]
    async fn cache_first_skips_ineligible_responses() {
        let fetcher = ScriptedFetcher::new();
        fetcher.respond("/missing.png", Response::new(404));
        let mut opaque = Response::new(200);
        opaque.response_type = ResponseType::Opaque;
        fetcher.respond("/opaque.js", opaque);
        let cache = cache().await;

        for path in ["/missing.png", "/opaque.js"] {
            let req = request(&fetcher, path);
            let (response, _) = cache_first(&cache, &fetcher, &req).await.unwrap();
            assert!(!response.is_cacheable());
            assert!(cache.match_request(&req).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn cache_first_propagates_network_failure() {
        let fetcher = ScriptedFetcher::new();
        fetcher.set_online(false);
        let cache = cache().await;

        let err = cache_first(&cache, &fetcher, &request(&fetcher, "/static/js/app.js"))
            .await
            .unwrap_err();
        assert!(err.is_offline());
    }

    #[tokio::test]
    async fn cache_first_does_not_store_posts() {
        let fetcher = ScriptedFetcher::new();
        fetcher.respond_text("/cadastro", "ok");
        let cache = cache().await;
        let req = Request::new("POST", fetcher.origin().join("/cadastro").unwrap());

        let (_, source) = cache_first(&cache, &fetcher, &req).await.unwrap();
        assert_eq!(source, ResponseSource::Network);
        assert!(cache.keys().await.unwrap().is_empty());
    }
}
