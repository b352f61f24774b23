//! In-memory cache storage

use crate::cache::{CacheKey, CacheStorage, CachedEntry};
use crate::error::{SwError, SwResult};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct MemoryStore {
    name: String,
    entries: HashMap<CacheKey, CachedEntry>,
}

/// Process-local storage; contents vanish with the process
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    // Vec keeps creation order for `names`
    stores: RwLock<Vec<MemoryStore>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, name: &str) -> SwResult<()> {
        let mut stores = self.stores.write().await;
        if !stores.iter().any(|s| s.name == name) {
            stores.push(MemoryStore {
                name: name.to_string(),
                entries: HashMap::new(),
            });
        }
        Ok(())
    }

    async fn has(&self, name: &str) -> SwResult<bool> {
        Ok(self.stores.read().await.iter().any(|s| s.name == name))
    }

    async fn delete(&self, name: &str) -> SwResult<bool> {
        let mut stores = self.stores.write().await;
        let before = stores.len();
        stores.retain(|s| s.name != name);
        Ok(stores.len() != before)
    }

    async fn names(&self) -> SwResult<Vec<String>> {
        Ok(self
            .stores
            .read()
            .await
            .iter()
            .map(|s| s.name.clone())
            .collect())
    }

    async fn get(&self, name: &str, key: &CacheKey) -> SwResult<Option<CachedEntry>> {
        let stores = self.stores.read().await;
        let store = stores
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| SwError::StoreNotFound(name.to_string()))?;
        Ok(store.entries.get(key).cloned())
    }

    async fn put(&self, name: &str, key: &CacheKey, entry: CachedEntry) -> SwResult<()> {
        let mut stores = self.stores.write().await;
        let store = stores
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| SwError::StoreNotFound(name.to_string()))?;
        store.entries.insert(key.clone(), entry);
        Ok(())
    }

    async fn remove(&self, name: &str, key: &CacheKey) -> SwResult<bool> {
        let mut stores = self.stores.write().await;
        let store = stores
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| SwError::StoreNotFound(name.to_string()))?;
        Ok(store.entries.remove(key).is_some())
    }

    async fn entries(&self, name: &str) -> SwResult<Vec<CachedEntry>> {
        let stores = self.stores.read().await;
        let store = stores
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| SwError::StoreNotFound(name.to_string()))?;
        let mut entries: Vec<CachedEntry> = store.entries.values().cloned().collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
