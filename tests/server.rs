//! End-to-end tests against a running server.

use std::sync::Arc;
use std::time::Duration;

use dataitem_service::config::ServiceConfig;
use dataitem_service::http::ErrorBody;
use dataitem_service::lifecycle::Shutdown;
use dataitem_service::{DataItemStore, HttpServer, SqliteStore};
use serde_json::{json, Value};

mod common;

async fn start_server(config: ServiceConfig) -> (String, Shutdown, tokio::task::JoinHandle<()>) {
    let store = SqliteStore::open(&config.database).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, Arc::new(store));
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move {
        server.run(listener, server_shutdown).await.unwrap();
    });

    (format!("http://{}", addr), shutdown, handle)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_crud_over_http() {
    let mut config = ServiceConfig::default();
    config.database.path = ":memory:".into();
    let (base, shutdown, handle) = start_server(config).await;
    let client = client();

    let res = client
        .post(format!("{base}{}/data", common::PREFIX))
        .json(&json!({"name": "widget", "uuid": "u-100", "data": "{}"}))
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 201);
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["id"], 1);

    let res = client
        .get(format!("{base}{}/data/u-100", common::PREFIX))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.json::<Value>().await.unwrap(), created);

    let res = client
        .delete(format!("{base}{}/data/u-100", common::PREFIX))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 204);

    let res = client
        .get(format!("{base}{}/data", common::PREFIX))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.json::<Value>().await.unwrap(), json!([]));

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop")
        .unwrap();
}

#[tokio::test]
async fn test_custom_prefix_and_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ServiceConfig::default();
    config.api.route_prefix = "/api/v2".into();
    config.database.path = dir.path().join("items.db").to_string_lossy().into_owned();
    let db_config = config.database.clone();

    let (base, shutdown, handle) = start_server(config).await;
    let client = client();

    let res = client
        .post(format!("{base}/api/v2/data"))
        .json(&json!({"name": "kept", "uuid": "u-1", "data": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);

    let res = client
        .get(format!("{base}/api/v1/data"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    shutdown.trigger();
    handle.await.unwrap();

    let reopened = SqliteStore::open(&db_config).unwrap();
    assert_eq!(reopened.find_by_uuid("u-1").unwrap().unwrap().data, "x");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let mut config = ServiceConfig::default();
    config.database.path = ":memory:".into();
    config.limits.max_body_size = 64;
    let (base, shutdown, handle) = start_server(config).await;

    let res = client()
        .post(format!("{base}{}/data", common::PREFIX))
        .json(&json!({"name": "n", "uuid": "u", "data": "x".repeat(1024)}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 413);
    assert_eq!(res.headers()["content-type"], "application/json");
    let body: ErrorBody = res.json().await.unwrap();
    assert!(!body.error.is_empty());

    shutdown.trigger();
    handle.await.unwrap();
}
