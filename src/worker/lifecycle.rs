//! Install / activate / message handling
//!
//! The controller owns the registration and drives generations through
//! their states. Store deletion and seeding go through `CacheStorage`.

use super::clients::Clients;
use super::message::ControlMessage;
use super::registration::{Registration, RegistrationStore};
use crate::cache::{Cache, CacheStorage};
use crate::config::{Config, SeedPolicy};
use crate::error::{SwError, SwResult};
use crate::net::{Fetcher, Request};
use futures_util::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

/// A seed asset that could not be stored
#[derive(Debug, Clone, Serialize)]
pub struct SeedFailure {
    pub asset: String,
    pub reason: String,
}

/// Result of an install event
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub tag: String,
    /// The tag was already active; nothing was done
    pub already_active: bool,
    pub seeded: Vec<String>,
    pub failed: Vec<SeedFailure>,
    /// Set when skip-waiting promoted the new generation right away
    pub promoted: Option<ActivateReport>,
}

impl InstallReport {
    fn already_active(tag: String) -> Self {
        Self {
            tag,
            already_active: true,
            seeded: Vec::new(),
            failed: Vec::new(),
            promoted: None,
        }
    }
}

/// A stale store that could not be deleted
#[derive(Debug, Clone, Serialize)]
pub struct DeleteFailure {
    pub store: String,
    pub reason: String,
}

/// Result of an activate event
#[derive(Debug, Clone, Serialize)]
pub struct ActivateReport {
    pub tag: String,
    pub deleted: Vec<String>,
    pub delete_failures: Vec<DeleteFailure>,
    /// Open pages that switched to this generation
    pub claimed: usize,
}

/// Result of a control message
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum MessageOutcome {
    Promoted(ActivateReport),
    NothingWaiting,
    Ignored,
}

/// Reacts to lifecycle events
///
/// Clone is cheap; all clones share registration, storage and clients.
#[derive(Clone)]
pub struct LifecycleController {
    version: String,
    origin: Url,
    seed_assets: Vec<String>,
    seed_policy: SeedPolicy,
    skip_waiting: bool,
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    clients: Clients,
    registration: Arc<Mutex<Registration>>,
    persistence: RegistrationStore,
}

impl LifecycleController {
    /// Build a controller, loading any saved registration
    pub async fn load(
        config: &Config,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
        clients: Clients,
        persistence: RegistrationStore,
    ) -> SwResult<Self> {
        let registration = persistence.load().await?;

        Ok(Self {
            version: config.worker.version.clone(),
            origin: config.worker.origin_url()?,
            seed_assets: config.seed.assets.clone(),
            seed_policy: config.seed.policy,
            skip_waiting: config.worker.skip_waiting,
            storage,
            fetcher,
            clients,
            registration: Arc::new(Mutex::new(registration)),
            persistence,
        })
    }

    /// Configured version tag
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn storage(&self) -> &Arc<dyn CacheStorage> {
        &self.storage
    }

    pub fn clients(&self) -> &Clients {
        &self.clients
    }

    /// Snapshot of the registration
    pub async fn registration(&self) -> Registration {
        self.registration.lock().await.clone()
    }

    /// Tag of the active generation, if any
    pub async fn current_version(&self) -> Option<String> {
        self.registration
            .lock()
            .await
            .active()
            .map(|g| g.tag.clone())
    }

    async fn persist(&self, registration: &mut Registration) -> SwResult<()> {
        registration.prune_history();
        self.persistence.save(registration).await
    }

    /// Handle the install event for the configured version
    pub async fn install(&self) -> SwResult<InstallReport> {
        let tag = self.version.clone();

        {
            let mut registration = self.registration.lock().await;
            if registration.active().is_some_and(|g| g.tag == tag) {
                info!("Version {} is already active, skipping install", tag);
                return Ok(InstallReport::already_active(tag));
            }
            let worker_id = registration.begin_install(&tag);
            self.persist(&mut registration).await?;
            info!("Installing {} (worker {})", tag, worker_id);
        }

        let cache = match Cache::open(self.storage.clone(), &tag).await {
            Ok(cache) => cache,
            Err(e) => {
                self.abandon_install(&tag).await?;
                return Err(e);
            }
        };

        let (seeded, failed) = self.seed(&cache).await;

        for failure in &failed {
            warn!("Seed {} not cached: {}", failure.asset, failure.reason);
        }

        if !failed.is_empty() && self.seed_policy == SeedPolicy::Atomic {
            if let Err(e) = self.storage.delete(&tag).await {
                warn!("Failed to drop partial store {}: {}", tag, e);
            }
            self.abandon_install(&tag).await?;
            return Err(SwError::SeedFailed {
                tag,
                failed: failed.into_iter().map(|f| f.asset).collect(),
            });
        }

        {
            let mut registration = self.registration.lock().await;
            registration.install_complete(&tag)?;
            self.persist(&mut registration).await?;
        }
        info!(
            "Installed {} ({} seeded, {} failed)",
            tag,
            seeded.len(),
            failed.len()
        );

        let promoted = if self.skip_waiting {
            self.skip_waiting().await?
        } else {
            None
        };

        Ok(InstallReport {
            tag,
            already_active: false,
            seeded,
            failed,
            promoted,
        })
    }

    async fn abandon_install(&self, tag: &str) -> SwResult<()> {
        let mut registration = self.registration.lock().await;
        registration.install_failed(tag);
        self.persist(&mut registration).await
    }

    /// Fetch every seed asset concurrently and store the OK ones
    async fn seed(&self, cache: &Cache) -> (Vec<String>, Vec<SeedFailure>) {
        let outcomes = join_all(
            self.seed_assets
                .iter()
                .map(|asset| self.seed_one(cache, asset)),
        )
        .await;

        let mut seeded = Vec::new();
        let mut failed = Vec::new();
        for (asset, outcome) in self.seed_assets.iter().zip(outcomes) {
            match outcome {
                Ok(()) => seeded.push(asset.clone()),
                Err(reason) => failed.push(SeedFailure {
                    asset: asset.clone(),
                    reason,
                }),
            }
        }
        (seeded, failed)
    }

    async fn seed_one(&self, cache: &Cache, asset: &str) -> Result<(), String> {
        let url = Request::resolve(asset, &self.origin).map_err(|e| e.to_string())?;
        let request = Request::get(url);

        let response = self
            .fetcher
            .fetch(&request)
            .await
            .map_err(|e| e.to_string())?;

        if !response.ok() {
            return Err(format!("HTTP {}", response.status));
        }

        cache
            .put(&request, response)
            .await
            .map_err(|e| e.to_string())?;
        debug!("Seeded {}", request.url());
        Ok(())
    }

    /// Promote the waiting generation now, if there is one
    pub async fn skip_waiting(&self) -> SwResult<Option<ActivateReport>> {
        if self.registration.lock().await.waiting().is_none() {
            debug!("skip_waiting: no waiting generation");
            return Ok(None);
        }
        self.activate().await.map(Some)
    }

    /// Handle the activate event
    ///
    /// Promotes the waiting generation (or keeps the active one), deletes
    /// every other store and claims open pages.
    pub async fn activate(&self) -> SwResult<ActivateReport> {
        let tag = {
            let mut registration = self.registration.lock().await;
            let tag = match registration.promote() {
                Some(tag) => tag,
                None => registration
                    .active()
                    .map(|g| g.tag.clone())
                    .ok_or(SwError::NothingToActivate)?,
            };
            self.persist(&mut registration).await?;
            tag
        };
        info!("Activating {}", tag);

        let names = self.storage.names().await?;
        let stale: Vec<String> = names.into_iter().filter(|name| *name != tag).collect();

        let results = join_all(stale.iter().map(|name| self.storage.delete(name))).await;

        let mut deleted = Vec::new();
        let mut delete_failures = Vec::new();
        for (name, result) in stale.into_iter().zip(results) {
            match result {
                Ok(_) => {
                    info!("Deleted stale store {}", name);
                    deleted.push(name);
                }
                Err(e) => {
                    warn!("Failed to delete stale store {}: {}", name, e);
                    delete_failures.push(DeleteFailure {
                        store: name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        {
            let mut registration = self.registration.lock().await;
            let retained: Vec<&str> = delete_failures.iter().map(|f| f.store.as_str()).collect();
            registration.purge_stale(&retained);
            self.persist(&mut registration).await?;
        }

        let claimed = self.clients.claim(&tag).await;
        info!("{} is active, claimed {} page(s)", tag, claimed);

        Ok(ActivateReport {
            tag,
            deleted,
            delete_failures,
            claimed,
        })
    }

    /// Handle a control message from a page
    pub async fn handle_message(&self, payload: &str) -> SwResult<MessageOutcome> {
        match ControlMessage::parse(payload) {
            ControlMessage::SkipWaiting => Ok(match self.skip_waiting().await? {
                Some(report) => MessageOutcome::Promoted(report),
                None => MessageOutcome::NothingWaiting,
            }),
            ControlMessage::Unknown(other) => {
                debug!("Ignoring message: {}", other);
                Ok(MessageOutcome::Ignored)
            }
        }
    }
}
