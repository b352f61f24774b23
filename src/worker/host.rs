//! Event dispatch and pending-work tracking
//!
//! Every dispatched event runs as its own task holding a `PendingWork`
//! guard until its future settles. `idle()` waits for all guards to drop.

use super::lifecycle::{ActivateReport, InstallReport, MessageOutcome};
use super::ServiceWorker;
use crate::error::SwResult;
use crate::net::Request;
use crate::router::Routed;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Keeps the host alive while an event is in flight
pub struct PendingWork {
    counter: Arc<watch::Sender<usize>>,
    kind: &'static str,
}

impl Drop for PendingWork {
    fn drop(&mut self) {
        self.counter.send_modify(|count| *count = count.saturating_sub(1));
        debug!("{} event settled", self.kind);
    }
}

/// Runs worker events concurrently
#[derive(Clone)]
pub struct WorkerHost {
    worker: ServiceWorker,
    pending: Arc<watch::Sender<usize>>,
}

impl WorkerHost {
    pub fn new(worker: ServiceWorker) -> Self {
        let (pending, _) = watch::channel(0usize);
        Self {
            worker,
            pending: Arc::new(pending),
        }
    }

    pub fn worker(&self) -> &ServiceWorker {
        &self.worker
    }

    /// Events currently in flight
    pub fn pending(&self) -> usize {
        *self.pending.borrow()
    }

    /// Register pending work; released when the guard drops
    pub fn begin(&self, kind: &'static str) -> PendingWork {
        self.pending.send_modify(|count| *count += 1);
        debug!("{} event dispatched", kind);
        PendingWork {
            counter: self.pending.clone(),
            kind,
        }
    }

    fn spawn<F, T>(&self, kind: &'static str, work: F) -> JoinHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let guard = self.begin(kind);
        tokio::spawn(async move {
            let _guard = guard;
            work.await
        })
    }

    pub fn dispatch_install(&self) -> JoinHandle<SwResult<InstallReport>> {
        let worker = self.worker.clone();
        self.spawn("install", async move { worker.install().await })
    }

    pub fn dispatch_activate(&self) -> JoinHandle<SwResult<ActivateReport>> {
        let worker = self.worker.clone();
        self.spawn("activate", async move { worker.activate().await })
    }

    pub fn dispatch_fetch(&self, request: Request) -> JoinHandle<SwResult<Routed>> {
        let worker = self.worker.clone();
        self.spawn("fetch", async move { worker.handle_fetch(&request).await })
    }

    pub fn dispatch_message(&self, payload: impl Into<String>) -> JoinHandle<SwResult<MessageOutcome>> {
        let worker = self.worker.clone();
        let payload = payload.into();
        self.spawn("message", async move { worker.handle_message(&payload).await })
    }

    /// Wait until no event is in flight
    pub async fn idle(&self) {
        let mut rx = self.pending.subscribe();
        // Sender is owned by self, so the channel cannot close here
        let _ = rx.wait_for(|count| *count == 0).await;
    }

    /// Stop accepting events once in-flight work has settled
    pub async fn terminate(self) {
        self.idle().await;
        info!("Worker host terminated");
    }
}
