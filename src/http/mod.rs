//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, routing)
//!     → request.rs (request ID, body decoding, validation)
//!     → handlers.rs (store calls on the blocking pool)
//!     → response.rs (status + JSON error mapping)
//!     → Send to client
//! ```
//!
//! # Routes
//! ```text
//! GET    {prefix}/data          list all items
//! GET    {prefix}/data/{uuid}   fetch one item
//! POST   {prefix}/data          create an item
//! PUT    {prefix}/data/{uuid}   overwrite an item
//! DELETE {prefix}/data/{uuid}   delete an item (idempotent)
//! GET    /health                liveness
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{ApiError, ErrorBody};
pub use server::{build_router, AppState, HttpServer};
