//! Install / activate / message scenarios against the on-disk store

use crate::support::{config, MockNetwork};
use ponto_sw::cache::{CacheStorage, DiskCacheStorage};
use ponto_sw::config::{ConfigManager, SeedPolicy};
use ponto_sw::worker::{GenerationState, MessageOutcome, ServiceWorker};
use ponto_sw::SwError;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn install_seeds_store_for_version() {
    let dir = TempDir::new().unwrap();
    let net = Arc::new(MockNetwork::new());
    net.serve("/", "<html>ponto</html>");
    net.serve("/login", "<html>login</html>");

    let cfg = config("v1", &["/", "/login"], dir.path());
    let worker = ServiceWorker::on_disk(&cfg, net.clone()).await.unwrap();
    let report = worker.install().await.unwrap();
    assert_eq!(report.seeded.len(), 2);

    let storage = DiskCacheStorage::new(ConfigManager::caches_dir(&cfg))
        .await
        .unwrap();
    let mut keys: Vec<String> = storage
        .entries("v1")
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.url)
        .collect();
    keys.sort();
    assert_eq!(
        keys,
        vec!["http://localhost:8000/", "http://localhost:8000/login"]
    );
}

#[tokio::test]
async fn atomic_seed_failure_keeps_previous_generation_live() {
    let dir = TempDir::new().unwrap();
    let net = Arc::new(MockNetwork::new());
    net.serve("/", "home");

    let v1 = config("v1", &["/"], dir.path());
    ServiceWorker::on_disk(&v1, net.clone())
        .await
        .unwrap()
        .install()
        .await
        .unwrap();

    let mut v2 = config("v2", &["/", "/static/js/app.js"], dir.path());
    v2.seed.policy = SeedPolicy::Atomic;
    let worker = ServiceWorker::on_disk(&v2, net.clone()).await.unwrap();

    let err = worker.install().await.unwrap_err();
    assert!(matches!(err, SwError::SeedFailed { .. }));

    assert_eq!(worker.storage().names().await.unwrap(), vec!["v1"]);
    let registration = worker.lifecycle().registration().await;
    assert_eq!(registration.active().unwrap().tag, "v1");
    assert_eq!(
        registration.generation("v2").unwrap().state,
        GenerationState::Purged
    );
}

#[tokio::test]
async fn upgrade_collects_stale_stores() {
    let dir = TempDir::new().unwrap();
    let net = Arc::new(MockNetwork::new());
    net.serve("/", "home");

    ServiceWorker::on_disk(&config("v1", &["/"], dir.path()), net.clone())
        .await
        .unwrap()
        .install()
        .await
        .unwrap();

    let mut v2 = config("v2", &["/"], dir.path());
    v2.worker.skip_waiting = false;
    let worker = ServiceWorker::on_disk(&v2, net.clone()).await.unwrap();
    worker.install().await.unwrap();
    assert_eq!(worker.storage().names().await.unwrap(), vec!["v1", "v2"]);

    let report = worker.activate().await.unwrap();
    assert_eq!(report.deleted, vec!["v1"]);
    assert!(report.delete_failures.is_empty());
    assert_eq!(worker.storage().names().await.unwrap(), vec!["v2"]);

    // The registration on disk agrees after a restart
    let restarted = ServiceWorker::on_disk(&v2, net).await.unwrap();
    let registration = restarted.lifecycle().registration().await;
    assert_eq!(registration.active().unwrap().tag, "v2");
    assert_eq!(
        registration.generation("v1").unwrap().state,
        GenerationState::Purged
    );
}

#[tokio::test]
async fn skip_waiting_message_claims_open_pages() {
    let dir = TempDir::new().unwrap();
    let net = Arc::new(MockNetwork::new());
    net.serve("/", "home");

    let mut cfg = config("v1", &["/"], dir.path());
    cfg.worker.skip_waiting = false;
    let worker = ServiceWorker::on_disk(&cfg, net.clone()).await.unwrap();

    let dashboard = worker.open_page(net.url("/dashboard")).await;
    let admin = worker.open_page(net.url("/admin")).await;
    assert!(dashboard.controller.is_none());

    let report = worker.install().await.unwrap();
    assert!(report.promoted.is_none());
    assert_eq!(worker.clients().controlled_by("v1").await, 0);

    let outcome = worker
        .handle_message(r#"{"type":"skipWaiting"}"#)
        .await
        .unwrap();
    match outcome {
        MessageOutcome::Promoted(report) => assert_eq!(report.claimed, 2),
        other => panic!("expected promotion, got {:?}", other),
    }

    for id in [dashboard.id, admin.id] {
        let client = worker.clients().get(id).await.unwrap();
        assert_eq!(client.controller.as_deref(), Some("v1"));
    }
}
