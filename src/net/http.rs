//! HTTP fetcher backed by `ureq`

use crate::config::schema::NetworkConfig;
use crate::error::{SwError, SwResult};
use crate::net::{reason_phrase, Fetcher, Headers, Request, Response, ResponseType};
use async_trait::async_trait;
use std::time::Duration;
use ureq::ResponseExt;
use tracing::debug;
use url::Url;

/// Fetcher performing real HTTP requests
///
/// `ureq` is blocking, so each request runs on the blocking pool.
/// Clone is cheap - the agent shares its connection pool.
#[derive(Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
    origin: Url,
    max_body_bytes: u64,
}

impl HttpFetcher {
    /// Create a fetcher for the worker origin
    pub fn new(origin: Url, network: &NetworkConfig) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(network.timeout_secs)))
            .http_status_as_error(false)
            .build();

        Self {
            agent: config.into(),
            origin,
            max_body_bytes: network.max_body_bytes,
        }
    }

    fn execute(&self, request: &Request) -> SwResult<Response> {
        let url = request.url().as_str();

        let mut builder = ureq::http::Request::builder()
            .method(request.method())
            .uri(url);
        for (name, value) in request.headers().iter() {
            builder = builder.header(name, value);
        }

        let result = match request.body() {
            Some(body) => {
                let http_request = builder
                    .body(body.to_vec())
                    .map_err(|e| SwError::network(url, e.to_string()))?;
                self.agent.run(http_request)
            }
            None => {
                let http_request = builder
                    .body(())
                    .map_err(|e| SwError::network(url, e.to_string()))?;
                self.agent.run(http_request)
            }
        };

        let mut http_response = result.map_err(|e| SwError::network(url, e.to_string()))?;

        let status = http_response.status().as_u16();
        let headers: Headers = http_response
            .headers()
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str(), v)))
            .collect();

        let body = http_response
            .body_mut()
            .with_config()
            .limit(self.max_body_bytes)
            .read_to_vec()
            .map_err(|e| SwError::network(url, e.to_string()))?;

        // Tainting follows the URL the body came from, after redirects
        let final_url = Url::parse(&http_response.get_uri().to_string())
            .unwrap_or_else(|_| request.url().clone());
        let response_type = if final_url.origin() == self.origin.origin() {
            ResponseType::Basic
        } else {
            ResponseType::Cors
        };

        debug!(
            "{} {} -> {} {} ({} bytes)",
            request.method(),
            url,
            status,
            final_url,
            body.len()
        );

        Ok(Response {
            status,
            status_text: reason_phrase(status).to_string(),
            headers,
            body,
            response_type,
            url: Some(final_url),
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &Request) -> SwResult<Response> {
        let fetcher = self.clone();
        let request = request.clone();
        tokio::task::spawn_blocking(move || fetcher.execute(&request))
            .await
            .map_err(|e| SwError::Internal(format!("fetch task failed: {}", e)))?
    }

    fn fetcher_name(&self) -> &'static str {
        "http"
    }
}
