//! Request routing scenarios through a running worker

use crate::support::{config, MockNetwork};
use ponto_sw::net::{Response, ResponseType};
use ponto_sw::router::{RouteClass, ResponseSource};
use ponto_sw::worker::{ServiceWorker, WorkerHost};
use std::sync::Arc;
use tempfile::TempDir;

async fn installed(net: Arc<MockNetwork>, dir: &TempDir) -> ServiceWorker {
    let cfg = config("v1", &["/"], dir.path());
    let worker = ServiceWorker::on_disk(&cfg, net).await.unwrap();
    worker.install().await.unwrap();
    worker
}

#[tokio::test]
async fn offline_api_call_gets_json_fallback() {
    let dir = TempDir::new().unwrap();
    let net = Arc::new(MockNetwork::new());
    net.serve("/", "home");
    let worker = installed(net.clone(), &dir).await;

    net.go_offline();
    let routed = worker.handle_fetch(&net.get("/auth/logout")).await.unwrap();

    assert_eq!(routed.class, RouteClass::Api);
    assert_eq!(routed.source, ResponseSource::Fallback);
    assert_eq!(routed.response.status, 200);
    assert_eq!(routed.response.content_type(), Some("application/json"));
    assert_eq!(
        routed.response.text(),
        r#"{"error":"Offline - Conecte-se à internet"}"#
    );
}

#[tokio::test]
async fn online_api_call_is_live_and_uncached() {
    let dir = TempDir::new().unwrap();
    let net = Arc::new(MockNetwork::new());
    net.serve("/", "home");
    net.serve("/ponto/hoje", r#"{"registros":[]}"#);
    let worker = installed(net.clone(), &dir).await;

    for _ in 0..2 {
        let routed = worker.handle_fetch(&net.get("/ponto/hoje")).await.unwrap();
        assert_eq!(routed.source, ResponseSource::Network);
        assert_eq!(routed.response.text(), r#"{"registros":[]}"#);
    }
    assert_eq!(net.calls_to("/ponto/hoje"), 2);

    let entries = worker.storage().entries("v1").await.unwrap();
    assert!(entries.iter().all(|e| !e.url.contains("/ponto/")));
}

#[tokio::test]
async fn asset_is_fetched_once_then_served_from_cache() {
    let dir = TempDir::new().unwrap();
    let net = Arc::new(MockNetwork::new());
    net.serve("/", "home");
    net.serve("/static/css/style.css", "body{margin:0}");
    let worker = installed(net.clone(), &dir).await;

    let first = worker
        .handle_fetch(&net.get("/static/css/style.css"))
        .await
        .unwrap();
    assert_eq!(first.source, ResponseSource::Network);

    net.go_offline();
    let second = worker
        .handle_fetch(&net.get("/static/css/style.css"))
        .await
        .unwrap();
    assert_eq!(second.source, ResponseSource::Cache);
    assert_eq!(second.response.text(), "body{margin:0}");
    assert_eq!(net.calls_to("/static/css/style.css"), 1);
}

#[tokio::test]
async fn ineligible_asset_responses_are_not_stored() {
    let dir = TempDir::new().unwrap();
    let net = Arc::new(MockNetwork::new());
    net.serve("/", "home");
    net.serve_response("/static/img/missing.png", Response::new(404));
    net.serve("https://cdn.example.com/chart.js", "chart");
    net.serve_response(
        "/static/opaque.js",
        Response::new(200).with_body("x").with_type(ResponseType::Opaque),
    );
    let worker = installed(net.clone(), &dir).await;

    for target in [
        "/static/img/missing.png",
        "https://cdn.example.com/chart.js",
        "/static/opaque.js",
    ] {
        let routed = worker.handle_fetch(&net.get(target)).await.unwrap();
        assert_eq!(routed.source, ResponseSource::Network);
    }

    // Only the seeded root is stored
    assert_eq!(worker.storage().entries("v1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn asset_miss_while_offline_is_an_error() {
    let dir = TempDir::new().unwrap();
    let net = Arc::new(MockNetwork::new());
    net.serve("/", "home");
    let worker = installed(net.clone(), &dir).await;

    net.go_offline();
    let err = worker
        .handle_fetch(&net.get("/static/js/app.js"))
        .await
        .unwrap_err();
    assert!(err.is_offline());

    // Seeded pages still load
    let root = worker.handle_fetch(&net.get("/")).await.unwrap();
    assert_eq!(root.source, ResponseSource::Cache);
    net.go_online();
}

#[tokio::test]
async fn waiting_generation_does_not_serve_until_promoted() {
    let dir = TempDir::new().unwrap();
    let net = Arc::new(MockNetwork::new());
    net.serve("/", "home");
    net.serve("/static/a.css", "a{}");

    ServiceWorker::on_disk(&config("v1", &["/", "/static/a.css"], dir.path()), net.clone())
        .await
        .unwrap()
        .install()
        .await
        .unwrap();

    let mut v2 = config("v2", &["/"], dir.path());
    v2.worker.skip_waiting = false;
    let worker = ServiceWorker::on_disk(&v2, net.clone()).await.unwrap();
    let report = worker.install().await.unwrap();
    assert!(report.promoted.is_none());

    net.go_offline();
    let routed = worker.handle_fetch(&net.get("/static/a.css")).await.unwrap();
    assert_eq!(routed.source, ResponseSource::Cache);
    assert_eq!(routed.response.text(), "a{}");
    assert_eq!(worker.storage().names().await.unwrap(), vec!["v1", "v2"]);
    assert_eq!(worker.storage().entries("v2").await.unwrap().len(), 1);

    // After promotion the v1 store is gone and v2 has no copy
    worker.activate().await.unwrap();
    let err = worker
        .handle_fetch(&net.get("/static/a.css"))
        .await
        .unwrap_err();
    assert!(err.is_offline());
}

#[tokio::test]
async fn fetch_before_install_creates_no_store() {
    let dir = TempDir::new().unwrap();
    let net = Arc::new(MockNetwork::new());
    net.serve("/static/js/app.js", "app()");
    let worker = ServiceWorker::on_disk(&config("v1", &["/"], dir.path()), net.clone())
        .await
        .unwrap();

    let routed = worker
        .handle_fetch(&net.get("/static/js/app.js"))
        .await
        .unwrap();
    assert_eq!(routed.source, ResponseSource::Network);
    assert!(worker.storage().names().await.unwrap().is_empty());

    net.go_offline();
    let fallback = worker.handle_fetch(&net.get("/auth/me")).await.unwrap();
    assert_eq!(fallback.source, ResponseSource::Fallback);
}

#[tokio::test]
async fn host_runs_fetches_concurrently_until_idle() {
    let dir = TempDir::new().unwrap();
    let net = Arc::new(MockNetwork::new());
    net.serve("/", "home");
    net.serve("/static/js/app.js", "app()");
    let worker = installed(net.clone(), &dir).await;
    let host = WorkerHost::new(worker);

    let handles: Vec<_> = ["/static/js/app.js", "/auth/me", "/"]
        .into_iter()
        .map(|target| host.dispatch_fetch(net.get(target)))
        .collect();

    host.idle().await;
    assert_eq!(host.pending(), 0);
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    host.terminate().await;
}
