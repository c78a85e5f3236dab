//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers, store and server produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID (x-request-id) attached to every request span
//! - Metrics exporter disabled by default

pub mod logging;
pub mod metrics;
