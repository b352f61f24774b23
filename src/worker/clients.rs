//! Controlled page sessions

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;
use uuid::Uuid;

/// An open page session
#[derive(Debug, Clone, Serialize)]
pub struct Client {
    pub id: Uuid,
    pub url: Url,
    /// Version tag of the worker serving this page, if any
    pub controller: Option<String>,
    pub opened_at: DateTime<Utc>,
}

/// Registry of open pages
///
/// Clone is cheap and shares the registry.
#[derive(Debug, Clone, Default)]
pub struct Clients {
    inner: Arc<RwLock<HashMap<Uuid, Client>>>,
}

impl Clients {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly opened page under the given controller
    pub async fn open(&self, url: Url, controller: Option<String>) -> Client {
        let client = Client {
            id: Uuid::new_v4(),
            url,
            controller,
            opened_at: Utc::now(),
        };
        self.inner.write().await.insert(client.id, client.clone());
        client
    }

    pub async fn get(&self, id: Uuid) -> Option<Client> {
        self.inner.read().await.get(&id).cloned()
    }

    /// Page closed
    pub async fn close(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }

    /// Take control of every open page; returns how many changed controller
    pub async fn claim(&self, tag: &str) -> usize {
        let mut clients = self.inner.write().await;
        let mut changed = 0;
        for client in clients.values_mut() {
            if client.controller.as_deref() != Some(tag) {
                client.controller = Some(tag.to_string());
                changed += 1;
            }
        }
        changed
    }

    /// Open pages, oldest first
    pub async fn list(&self) -> Vec<Client> {
        let mut clients: Vec<Client> = self.inner.read().await.values().cloned().collect();
        clients.sort_by(|a, b| a.opened_at.cmp(&b.opened_at));
        clients
    }

    pub async fn controlled_by(&self, tag: &str) -> usize {
        self.inner
            .read()
            .await
            .values()
            .filter(|c| c.controller.as_deref() == Some(tag))
            .count()
    }
}
