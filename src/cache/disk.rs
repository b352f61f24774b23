//! Durable on-disk cache storage
//!
//! Layout under the caches directory:
//!
//! ```text
//! caches/
//!   <hex(store name)>/
//!     store.json            # name + creation time
//!     <sha256(key)>.json    # one file per entry
//! ```
//!
//! Every file is written to a temporary name and renamed into place, so a
//! reader sees either the old entry or the new one, never a torn write.

use crate::cache::{CacheKey, CacheStorage, CachedEntry};
use crate::error::{SwError, SwResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

const MANIFEST_FILE: &str = "store.json";

/// Per-store metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreManifest {
    name: String,
    created_at: DateTime<Utc>,
}

/// Storage persisted under a directory; survives process restarts
#[derive(Debug, Clone)]
pub struct DiskCacheStorage {
    root: PathBuf,
}

impl DiskCacheStorage {
    /// Use `root` as the caches directory, creating it if needed
    pub async fn new(root: PathBuf) -> SwResult<Self> {
        fs::create_dir_all(&root)
            .await
            .map_err(|e| SwError::io(format!("creating caches directory {}", root.display()), e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn store_dir(&self, name: &str) -> PathBuf {
        self.root.join(hex::encode(name.as_bytes()))
    }

    fn entry_path(&self, name: &str, key: &CacheKey) -> PathBuf {
        self.store_dir(name).join(format!("{}.json", key.digest()))
    }

    async fn require_store(&self, name: &str) -> SwResult<PathBuf> {
        let dir = self.store_dir(name);
        if !dir.join(MANIFEST_FILE).exists() {
            return Err(SwError::StoreNotFound(name.to_string()));
        }
        Ok(dir)
    }

    async fn read_manifest(dir: &Path) -> Option<StoreManifest> {
        let path = dir.join(MANIFEST_FILE);
        let content = fs::read_to_string(&path).await.ok()?;
        match serde_json::from_str(&content) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                warn!("Ignoring cache store with corrupt manifest {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Write a file atomically: temp file in the same directory, then rename
async fn write_atomic(path: &Path, contents: &[u8]) -> SwResult<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| SwError::Internal(format!("invalid cache path {}", path.display())))?;
    let tmp = path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

    fs::write(&tmp, contents)
        .await
        .map_err(|e| SwError::io(format!("writing {}", tmp.display()), e))?;

    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(SwError::io(format!("replacing {}", path.display()), e));
    }
    Ok(())
}

#[async_trait]
impl CacheStorage for DiskCacheStorage {
    async fn open(&self, name: &str) -> SwResult<()> {
        let dir = self.store_dir(name);
        if dir.join(MANIFEST_FILE).exists() {
            return Ok(());
        }

        fs::create_dir_all(&dir)
            .await
            .map_err(|e| SwError::io(format!("creating cache store {}", dir.display()), e))?;

        let manifest = StoreManifest {
            name: name.to_string(),
            created_at: Utc::now(),
        };
        write_atomic(
            &dir.join(MANIFEST_FILE),
            serde_json::to_string_pretty(&manifest)?.as_bytes(),
        )
        .await?;

        debug!("Created cache store {} at {}", name, dir.display());
        Ok(())
    }

    async fn has(&self, name: &str) -> SwResult<bool> {
        Ok(self.store_dir(name).join(MANIFEST_FILE).exists())
    }

    async fn delete(&self, name: &str) -> SwResult<bool> {
        let dir = self.store_dir(name);
        if !dir.exists() {
            return Ok(false);
        }

        fs::remove_dir_all(&dir)
            .await
            .map_err(|e| SwError::cache(name, format!("deleting {}: {}", dir.display(), e)))?;
        Ok(true)
    }

    async fn names(&self) -> SwResult<Vec<String>> {
        if !self.root.exists() {
            return Ok(vec![]);
        }

        let mut manifests = vec![];
        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(|e| SwError::io("reading caches directory", e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| SwError::io("reading cache store entry", e))?
        {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(manifest) = Self::read_manifest(&path).await {
                manifests.push(manifest);
            }
        }

        manifests.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(manifests.into_iter().map(|m| m.name).collect())
    }

    async fn get(&self, name: &str, key: &CacheKey) -> SwResult<Option<CachedEntry>> {
        self.require_store(name).await?;

        let path = self.entry_path(name, key);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SwError::io(format!("reading {}", path.display()), e)),
        };

        let entry: CachedEntry = serde_json::from_str(&content)
            .map_err(|e| SwError::cache(name, format!("corrupt entry {}: {}", path.display(), e)))?;

        // Digest collision guard
        if entry.key != key.to_string() {
            return Ok(None);
        }
        Ok(Some(entry))
    }

    async fn put(&self, name: &str, key: &CacheKey, entry: CachedEntry) -> SwResult<()> {
        self.require_store(name).await?;
        let content = serde_json::to_vec(&entry)?;
        write_atomic(&self.entry_path(name, key), &content).await
    }

    async fn remove(&self, name: &str, key: &CacheKey) -> SwResult<bool> {
        self.require_store(name).await?;
        let path = self.entry_path(name, key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SwError::io(format!("removing {}", path.display()), e)),
        }
    }

    async fn entries(&self, name: &str) -> SwResult<Vec<CachedEntry>> {
        let dir = self.require_store(name).await?;

        let mut result = vec![];
        let mut dir_entries = fs::read_dir(&dir)
            .await
            .map_err(|e| SwError::io(format!("reading cache store {}", dir.display()), e))?;

        while let Some(entry) = dir_entries
            .next_entry()
            .await
            .map_err(|e| SwError::io("reading cache entry", e))?
        {
            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if file_name == MANIFEST_FILE || file_name.starts_with('.') || !file_name.ends_with(".json") {
                continue;
            }

            let Ok(content) = fs::read_to_string(&path).await else {
                continue;
            };
            match serde_json::from_str::<CachedEntry>(&content) {
                Ok(cached) => result.push(cached),
                Err(e) => warn!("Skipping corrupt cache entry {}: {}", path.display(), e),
            }
        }

        result.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(result)
    }

    fn backend_name(&self) -> &'static str {
        "disk"
    }
}
