//! Handle to one named cache store

use crate::cache::{CacheKey, CacheStorage, CachedEntry};
use crate::error::{SwError, SwResult};
use crate::net::{Request, Response};
use std::sync::Arc;
use tracing::debug;

/// A single version's store, bound to its storage backend
#[derive(Clone)]
pub struct Cache {
    name: String,
    storage: Arc<dyn CacheStorage>,
}

impl Cache {
    /// Open (creating if absent) the store named `name`
    pub async fn open(storage: Arc<dyn CacheStorage>, name: &str) -> SwResult<Self> {
        storage.open(name).await?;
        Ok(Self {
            name: name.to_string(),
            storage,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Find the stored response for a request
    pub async fn match_request(&self, request: &Request) -> SwResult<Option<Response>> {
        let key = CacheKey::for_request(request);
        let entry = self.storage.get(&self.name, &key).await?;

        Ok(entry
            .filter(|e| e.matches(request))
            .map(|e| e.to_response()))
    }

    /// Store a response under the request's key
    ///
    /// Takes the response by value; callers keep their own copy by cloning
    /// before the call.
    pub async fn put(&self, request: &Request, response: Response) -> SwResult<()> {
        if !request.is_get() {
            return Err(SwError::cache(
                &self.name,
                format!("cannot store {} request {}", request.method(), request.url()),
            ));
        }

        let key = CacheKey::for_request(request);
        let entry = CachedEntry::capture(request, response);
        if entry.vary.any {
            return Err(SwError::cache(
                &self.name,
                format!("response for {} has Vary: *", request.url()),
            ));
        }

        self.storage.put(&self.name, &key, entry).await?;
        debug!("Stored {} in {}", key, self.name);
        Ok(())
    }

    /// Remove the entry for a request
    pub async fn delete(&self, request: &Request) -> SwResult<bool> {
        self.storage
            .remove(&self.name, &CacheKey::for_request(request))
            .await
    }

    /// All entries of the store
    pub async fn entries(&self) -> SwResult<Vec<CachedEntry>> {
        self.storage.entries(&self.name).await
    }

    /// Keys ("METHOD url") of all stored entries
    pub async fn keys(&self) -> SwResult<Vec<String>> {
        Ok(self.entries().await?.into_iter().map(|e| e.key).collect())
    }
}
