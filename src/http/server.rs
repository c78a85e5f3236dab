//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the DataItem handlers under the API prefix
//! - Wire up middleware (tracing, limits, timeouts, request ID, metrics)
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    middleware,
    routing::get,
    BoxError, Router,
};
use tokio::net::TcpListener;
use tower::{timeout::error::Elapsed, ServiceBuilder};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::handlers::{
    create_item, delete_item, get_item, health, list_items, method_not_allowed, no_route,
    update_item,
};
use crate::http::request::{request_span, X_REQUEST_ID};
use crate::http::response::ApiError;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::store::DataItemStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DataItemStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn DataItemStore>) -> Self {
        Self { store }
    }
}

/// HTTP server for the DataItem API.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server over the given store.
    pub fn new(config: ServiceConfig, store: Arc<dyn DataItemStore>) -> Self {
        let router = build_router(&config, AppState::new(store));
        Self { router, config }
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            route_prefix = %self.config.api.route_prefix,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(config: &ServiceConfig, state: AppState) -> Router {
    let api = Router::new()
        .route("/data", get(list_items).post(create_item))
        .route(
            "/data/{uuid}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .method_not_allowed_fallback(method_not_allowed);

    Router::new()
        .nest(&config.api.route_prefix, api)
        .route("/health", get(health))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(no_route)
        .route_layer(middleware::from_fn(metrics::track_requests))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.limits.max_body_size))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout))
                .timeout(Duration::from_secs(config.timeouts.request_secs)),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
}

/// Turn errors from the timeout layer into JSON responses.
async fn handle_timeout(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Internal(err.to_string())
    }
}
