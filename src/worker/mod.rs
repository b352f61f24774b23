//! The offline worker
//!
//! `ServiceWorker` ties the lifecycle controller, the request router and the
//! clients registry together over one storage backend and one fetcher.
//! `WorkerHost` runs its events as concurrent tasks.

mod clients;
mod host;
mod lifecycle;
mod message;
mod registration;

pub use clients::{Client, Clients};
pub use host::{PendingWork, WorkerHost};
pub use lifecycle::{
    ActivateReport, DeleteFailure, InstallReport, LifecycleController, MessageOutcome,
    SeedFailure,
};
pub use message::ControlMessage;
pub use registration::{Generation, GenerationState, Registration, RegistrationStore};

use crate::cache::{CacheStorage, DiskCacheStorage, MemoryCacheStorage};
use crate::config::{Config, ConfigManager};
use crate::error::SwResult;
use crate::net::{Fetcher, Request};
use crate::router::{Routed, Router};
use std::sync::Arc;
use url::Url;

/// One worker instance
#[derive(Clone)]
pub struct ServiceWorker {
    lifecycle: LifecycleController,
    router: Router,
}

impl ServiceWorker {
    pub async fn new(
        config: &Config,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
        persistence: RegistrationStore,
    ) -> SwResult<Self> {
        let router = Router::new(config, storage.clone(), fetcher.clone());
        let lifecycle =
            LifecycleController::load(config, storage, fetcher, Clients::new(), persistence)
                .await?;
        Ok(Self { lifecycle, router })
    }

    /// Worker over the durable state directory
    pub async fn on_disk(config: &Config, fetcher: Arc<dyn Fetcher>) -> SwResult<Self> {
        ConfigManager::ensure_state_dirs(config).await?;
        let storage = DiskCacheStorage::new(ConfigManager::caches_dir(config)).await?;
        let persistence = RegistrationStore::file(ConfigManager::registration_path(config));
        Self::new(config, Arc::new(storage), fetcher, persistence).await
    }

    /// Worker whose stores and registration vanish with it
    pub async fn in_memory(config: &Config, fetcher: Arc<dyn Fetcher>) -> SwResult<Self> {
        Self::new(
            config,
            Arc::new(MemoryCacheStorage::new()),
            fetcher,
            RegistrationStore::memory(),
        )
        .await
    }

    pub fn lifecycle(&self) -> &LifecycleController {
        &self.lifecycle
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn storage(&self) -> &Arc<dyn CacheStorage> {
        self.lifecycle.storage()
    }

    pub fn clients(&self) -> &Clients {
        self.lifecycle.clients()
    }

    pub async fn install(&self) -> SwResult<InstallReport> {
        self.lifecycle.install().await
    }

    pub async fn activate(&self) -> SwResult<ActivateReport> {
        self.lifecycle.activate().await
    }

    pub async fn skip_waiting(&self) -> SwResult<Option<ActivateReport>> {
        self.lifecycle.skip_waiting().await
    }

    pub async fn handle_message(&self, payload: &str) -> SwResult<MessageOutcome> {
        self.lifecycle.handle_message(payload).await
    }

    /// Route a request against the active generation's store
    ///
    /// A newer generation that is only waiting does not serve until it is
    /// promoted.
    pub async fn handle_fetch(&self, request: &Request) -> SwResult<Routed> {
        let active = self.lifecycle.current_version().await;
        self.router.handle_fetch(active.as_deref(), request).await
    }

    /// A page opened; it is controlled by the active generation, if any
    pub async fn open_page(&self, url: Url) -> Client {
        let controller = self.lifecycle.current_version().await;
        self.clients().open(url, controller).await
    }
}
