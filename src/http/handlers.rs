//! DataItem endpoint handlers.
//!
//! Each handler decodes its input, makes store calls on the blocking pool,
//! and maps the outcome to a status code and JSON body.

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    Json,
};
use serde::Serialize;

use crate::http::request::{
    decode, item_key, validate_create, validate_update, ItemKey, ItemPayload,
};
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::store::{DataItem, DataItemStore, StoreResult};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Fallback for paths no route matches.
pub async fn no_route(uri: Uri) -> ApiError {
    ApiError::no_route(&uri)
}

/// Fallback for known paths requested with an unsupported method.
pub async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(method)
}

/// GET /data
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<DataItem>>, ApiError> {
    let items = run_store(&state, "list_all", |store| store.list_all()).await?;
    Ok(Json(items))
}

/// GET /data/{uuid}
pub async fn get_item(
    State(state): State<AppState>,
    key: ItemKey,
) -> Result<Json<DataItem>, ApiError> {
    let uuid = item_key(key)?;
    let key = uuid.clone();
    run_store(&state, "find_by_uuid", move |store| store.find_by_uuid(&key))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::item_not_found(&uuid))
}

/// POST /data
pub async fn create_item(
    State(state): State<AppState>,
    payload: ItemPayload,
) -> Result<(StatusCode, Json<DataItem>), ApiError> {
    let input = decode(payload)?;
    validate_create(&input)?;

    let uuid = input.uuid.clone();
    let created = run_store(&state, "insert", move |store| store.insert(input))
        .await
        .map_err(|e| e.for_uuid(&uuid))?;

    tracing::info!(id = created.id, uuid = %created.uuid, "DataItem created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /data/{uuid}
///
/// The path names the record to rewrite; the body carries all of its new
/// fields, including a possibly different uuid.
pub async fn update_item(
    State(state): State<AppState>,
    key: ItemKey,
    payload: ItemPayload,
) -> Result<Json<DataItem>, ApiError> {
    let uuid = item_key(key)?;
    let key = uuid.clone();
    let existing = run_store(&state, "find_by_uuid", move |store| store.find_by_uuid(&key))
        .await?
        .ok_or_else(|| ApiError::item_not_found(&uuid))?;

    let input = decode(payload)?;
    validate_update(&input)?;

    let new_uuid = input.uuid.clone();
    let updated = run_store(&state, "update_by_id", move |store| {
        store.update_by_id(existing.id, input)
    })
    .await
    .map_err(|e| e.for_uuid(&new_uuid))?;

    tracing::info!(id = updated.id, uuid = %updated.uuid, "DataItem updated");
    Ok(Json(updated))
}

/// DELETE /data/{uuid}
///
/// Succeeds whether or not the record existed.
pub async fn delete_item(
    State(state): State<AppState>,
    key: ItemKey,
) -> Result<StatusCode, ApiError> {
    let uuid = item_key(key)?;
    let key = uuid.clone();
    let removed = run_store(&state, "delete_by_uuid", move |store| store.delete_by_uuid(&key)).await?;

    if removed {
        tracing::info!(uuid = %uuid, "DataItem deleted");
    } else {
        tracing::debug!(uuid = %uuid, "Delete of absent DataItem");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Run one store call on the blocking pool.
async fn run_store<T, F>(state: &AppState, operation: &'static str, call: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&dyn DataItemStore) -> StoreResult<T> + Send + 'static,
{
    let store = state.store.clone();
    let result = tokio::task::spawn_blocking(move || call(store.as_ref()))
        .await
        .map_err(|e| {
            metrics::record_store_error(operation);
            ApiError::Internal(format!("{operation}: {e}"))
        })?;

    result.map_err(|e| {
        metrics::record_store_error(operation);
        tracing::warn!(operation, error = %e, "Store call failed");
        ApiError::from(e)
    })
}
