//! Request handling helpers.
//!
//! # Responsibilities
//! - Request ID header and per-request tracing span
//! - Decode and validate DataItem request bodies
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Validation is emptiness checks only; `uuid` and `data` formats are free

use axum::{
    body::Body,
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    http::{HeaderName, Request},
    Json,
};
use tracing::Span;

use crate::http::response::ApiError;
use crate::store::NewDataItem;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// A DataItem body as handed to a handler, decoded or not.
pub type ItemPayload = Result<Json<NewDataItem>, JsonRejection>;

/// The `{uuid}` path segment, decoded or not.
pub type ItemKey = Result<Path<String>, PathRejection>;

/// Span wrapping a whole request, tagged with its request ID.
pub fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

/// Unwrap a decoded body, turning decoder rejections into JSON errors.
pub fn decode(payload: ItemPayload) -> Result<NewDataItem, ApiError> {
    let Json(item) = payload?;
    Ok(item)
}

/// Unwrap the path uuid, turning bad percent-encoding into a JSON error.
pub fn item_key(key: ItemKey) -> Result<String, ApiError> {
    let Path(uuid) = key?;
    Ok(uuid)
}

/// Create requires a name.
pub fn validate_create(item: &NewDataItem) -> Result<(), ApiError> {
    if item.name.is_empty() {
        return Err(ApiError::fields_empty());
    }
    Ok(())
}

/// Update rewrites the whole row, so both name and uuid are required.
pub fn validate_update(item: &NewDataItem) -> Result<(), ApiError> {
    if item.name.is_empty() || item.uuid.is_empty() {
        return Err(ApiError::fields_empty());
    }
    Ok(())
}
