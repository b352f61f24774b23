//! Cache storage abstraction
//!
//! The set of named cache stores, one per version tag. Implementations
//! must make a single-entry write atomic; nothing else is locked.

use crate::cache::{CacheKey, CachedEntry};
use crate::error::SwResult;
use async_trait::async_trait;

/// Abstract named-store interface
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Create the store if it does not exist
    async fn open(&self, name: &str) -> SwResult<()>;

    /// Check whether a store exists
    async fn has(&self, name: &str) -> SwResult<bool>;

    /// Delete a store and all its entries; `false` if it did not exist
    async fn delete(&self, name: &str) -> SwResult<bool>;

    /// Store names in creation order
    async fn names(&self) -> SwResult<Vec<String>>;

    /// Look up an entry by key
    async fn get(&self, name: &str, key: &CacheKey) -> SwResult<Option<CachedEntry>>;

    /// Insert or replace an entry
    async fn put(&self, name: &str, key: &CacheKey, entry: CachedEntry) -> SwResult<()>;

    /// Remove an entry; `false` if it was absent
    async fn remove(&self, name: &str, key: &CacheKey) -> SwResult<bool>;

    /// All entries of a store
    async fn entries(&self, name: &str) -> SwResult<Vec<CachedEntry>>;

    /// Get the human-readable backend name for display
    fn backend_name(&self) -> &'static str;
}
