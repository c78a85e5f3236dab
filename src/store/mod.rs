//! DataItem persistence subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → DataItemStore trait (one statement per call)
//!     → sqlite.rs (rusqlite, shared connection)
//!     → `dataitem` table
//! ```
//!
//! # Design Decisions
//! - Handlers receive the store as `Arc<dyn DataItemStore>`; no global handle
//! - Operations are synchronous; async callers run them on the blocking pool
//! - Missing rows on reads are `Ok(None)`, not errors

pub mod sqlite;
pub mod types;

pub use sqlite::SqliteStore;
pub use types::{DataItem, ItemId, NewDataItem, StoreError, StoreResult};

/// Data-access facade over the DataItem table.
pub trait DataItemStore: Send + Sync + 'static {
    /// All rows, ordered by id.
    fn list_all(&self) -> StoreResult<Vec<DataItem>>;

    /// The row whose uuid matches, if any.
    fn find_by_uuid(&self, uuid: &str) -> StoreResult<Option<DataItem>>;

    /// Insert a row and return it with its newly assigned id.
    fn insert(&self, item: NewDataItem) -> StoreResult<DataItem>;

    /// Overwrite every caller-supplied field of row `id`.
    fn update_by_id(&self, id: ItemId, item: NewDataItem) -> StoreResult<DataItem>;

    /// Remove the row with `uuid`. Returns whether a row existed.
    fn delete_by_uuid(&self, uuid: &str) -> StoreResult<bool>;
}
