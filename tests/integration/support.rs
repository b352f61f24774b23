//! Shared fixtures: a scripted network and worker configs

use async_trait::async_trait;
use ponto_sw::config::Config;
use ponto_sw::net::{Fetcher, Request, Response, ResponseType};
use ponto_sw::{SwError, SwResult};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use url::Url;

pub const ORIGIN: &str = "http://localhost:8000";

/// Network double serving canned responses by URL
pub struct MockNetwork {
    origin: Url,
    responses: Mutex<HashMap<String, Response>>,
    online: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl MockNetwork {
    pub fn new() -> Self {
        Self {
            origin: Url::parse(ORIGIN).unwrap(),
            responses: Mutex::new(HashMap::new()),
            online: AtomicBool::new(true),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Serve `body` with status 200 at a path or absolute URL
    pub fn serve(&self, target: &str, body: &str) {
        self.serve_response(target, Response::new(200).with_body(body));
    }

    pub fn serve_response(&self, target: &str, response: Response) {
        let url = Request::resolve(target, &self.origin).unwrap();
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    pub fn go_offline(&self) {
        self.online.store(false, Ordering::SeqCst);
    }

    pub fn go_online(&self) {
        self.online.store(true, Ordering::SeqCst);
    }

    pub fn calls_to(&self, target: &str) -> usize {
        let url = Request::resolve(target, &self.origin).unwrap().to_string();
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == url)
            .count()
    }

    pub fn url(&self, target: &str) -> Url {
        Request::resolve(target, &self.origin).unwrap()
    }

    pub fn get(&self, target: &str) -> Request {
        Request::get(self.url(target))
    }
}

#[async_trait]
impl Fetcher for MockNetwork {
    async fn fetch(&self, request: &Request) -> SwResult<Response> {
        let url = request.url().to_string();
        self.calls.lock().unwrap().push(url.clone());

        if !self.online.load(Ordering::SeqCst) {
            return Err(SwError::network(url, "connection refused"));
        }

        let mut response = self
            .responses
            .lock()
            .unwrap()
            .get(&url)
            .cloned()
            .unwrap_or_else(|| Response::new(404));

        if response.response_type == ResponseType::Default {
            response.response_type = if request.is_same_origin(&self.origin) {
                ResponseType::Basic
            } else {
                ResponseType::Cors
            };
        }
        response.url = Some(request.url().clone());
        Ok(response)
    }

    fn fetcher_name(&self) -> &'static str {
        "mock"
    }
}

/// Config for `version` with the given seeds, state under `state_dir`
pub fn config(version: &str, seeds: &[&str], state_dir: &Path) -> Config {
    let mut config = Config::default();
    config.worker.version = version.to_string();
    config.worker.origin = ORIGIN.to_string();
    config.seed.assets = seeds.iter().map(|s| s.to_string()).collect();
    config.storage.state_dir = Some(state_dir.to_path_buf());
    config
}
