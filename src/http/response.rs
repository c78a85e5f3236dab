//! Error responses.
//!
//! # Responsibilities
//! - Map validation, lookup and storage failures to HTTP status codes
//! - Render every failure as `{"error": "<message>"}`
//!
//! # Design Decisions
//! - Storage details are logged, never sent to the client
//! - Decoder rejections keep the status axum chose (400/413/415/422)
//! - Unrouted requests and timeouts use the same JSON body as handler errors

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Errors surfaced by the request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is empty.
    #[error("{0}")]
    Validation(String),

    /// No record matches the request.
    #[error("{0}")]
    NotFound(String),

    /// The write collides with an existing record.
    #[error("{0}")]
    Conflict(String),

    /// The request body or path could not be decoded.
    #[error("{message}")]
    BadRequest { status: StatusCode, message: String },

    /// The route exists but not for this method.
    #[error("method {0} not allowed")]
    MethodNotAllowed(Method),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The backing store failed.
    #[error("storage failure")]
    Storage(#[source] StoreError),

    /// The blocking task running a store call did not complete.
    #[error("internal error")]
    Internal(String),
}

impl ApiError {
    pub fn item_not_found(uuid: &str) -> Self {
        Self::NotFound(format!("dataItem with uuid#{uuid} not found"))
    }

    pub fn fields_empty() -> Self {
        Self::Validation("fields are empty".to_string())
    }

    pub fn no_route(uri: &Uri) -> Self {
        Self::NotFound(format!("no route for {}", uri.path()))
    }

    /// Reword a storage conflict in terms of the uuid being written.
    pub fn for_uuid(self, uuid: &str) -> Self {
        match self {
            Self::Conflict(_) => Self::Conflict(format!("dataItem with uuid#{uuid} already exists")),
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadRequest { status, .. } => *status,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(format!("dataItem with id#{id} not found")),
            StoreError::Conflict(message) => Self::Conflict(message),
            other => Self::Storage(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Storage(e) => tracing::error!(error = %e, "Store operation failed"),
            Self::Internal(e) => tracing::error!(error = %e, "Store task failed"),
            _ => tracing::debug!(error = %self, status = %self.status(), "Request rejected"),
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::fields_empty().status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ApiError::item_not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(StoreError::Poisoned).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(StoreError::Conflict("UNIQUE".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(StoreError::NotFound(3)).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_routing_errors() {
        let err = ApiError::MethodNotAllowed(Method::PATCH);
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(err.to_string(), "method PATCH not allowed");

        let err = ApiError::no_route(&Uri::from_static("/api/v1/other?x=1"));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "no route for /api/v1/other");

        assert_eq!(ApiError::Timeout.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            ApiError::item_not_found("does-not-exist").to_string(),
            "dataItem with uuid#does-not-exist not found"
        );
    }

    #[test]
    fn test_storage_details_hidden() {
        let err = ApiError::from(StoreError::Poisoned);
        assert_eq!(err.to_string(), "storage failure");
    }

    #[test]
    fn test_for_uuid_only_rewords_conflicts() {
        let err = ApiError::from(StoreError::Conflict("UNIQUE constraint failed".into())).for_uuid("u-1");
        assert_eq!(err.to_string(), "dataItem with uuid#u-1 already exists");

        let err = ApiError::fields_empty().for_uuid("u-1");
        assert_eq!(err.to_string(), "fields are empty");
    }
}
