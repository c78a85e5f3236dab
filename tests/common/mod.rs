//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use dataitem_service::config::ServiceConfig;
use dataitem_service::http::build_router;
use dataitem_service::http::{AppState, ErrorBody};
use dataitem_service::store::{
    DataItem, DataItemStore, ItemId, NewDataItem, SqliteStore, StoreError, StoreResult,
};
use serde_json::Value;
use tower::ServiceExt;

pub const PREFIX: &str = "/api/v1";

/// Router over a fresh in-memory store, plus a handle to that store.
pub fn test_app() -> (Router, Arc<SqliteStore>) {
    test_app_with(ServiceConfig::default())
}

pub fn test_app_with(config: ServiceConfig) -> (Router, Arc<SqliteStore>) {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let router = build_router(&config, AppState::new(store.clone()));
    (router, store)
}

/// Router over a store whose every call fails.
pub fn failing_app() -> Router {
    build_router(&ServiceConfig::default(), AppState::new(Arc::new(FailingStore)))
}

/// Send one request through the router and decode the JSON response, if any.
pub async fn send(
    router: &Router,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Option<Value>) {
    let mut builder = Request::builder()
        .method(method)
        .uri(format!("{PREFIX}{path}"));

    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&bytes).expect("response body is not JSON"))
    };
    (status, json)
}

/// Decode an error response, checking it is served as JSON.
pub async fn error_body(response: Response) -> ErrorBody {
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json",
        "error responses must be JSON"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).expect("error body does not match ErrorBody")
}

/// Store whose every call fails as if the database were unreachable.
pub struct FailingStore;

impl DataItemStore for FailingStore {
    fn list_all(&self) -> StoreResult<Vec<DataItem>> {
        Err(StoreError::Poisoned)
    }

    fn find_by_uuid(&self, _uuid: &str) -> StoreResult<Option<DataItem>> {
        Err(StoreError::Poisoned)
    }

    fn insert(&self, _item: NewDataItem) -> StoreResult<DataItem> {
        Err(StoreError::Poisoned)
    }

    fn update_by_id(&self, _id: ItemId, _item: NewDataItem) -> StoreResult<DataItem> {
        Err(StoreError::Poisoned)
    }

    fn delete_by_uuid(&self, _uuid: &str) -> StoreResult<bool> {
        Err(StoreError::Poisoned)
    }
}
