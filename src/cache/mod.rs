//! Versioned cache stores
//!
//! One named store per version tag. A store maps request identity
//! (method + URL, refined by the response's `Vary` header) to a captured
//! response.
//!
//! # Backends
//!
//! | Backend | Durability | Used by |
//! |---------|------------|---------|
//! | `DiskCacheStorage` | survives restarts | CLI, long-running hosts |
//! | `MemoryCacheStorage` | process lifetime | tests, embedding |

mod disk;
mod entry;
mod memory;
mod storage;
mod store;

pub use disk::DiskCacheStorage;
pub use entry::{CacheKey, CachedEntry, VarySnapshot};
pub use memory::MemoryCacheStorage;
pub use storage::CacheStorage;
pub use store::Cache;
