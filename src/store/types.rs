//! DataItem entity and store error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Server-assigned surrogate key of a DataItem row.
pub type ItemId = i64;

/// A persisted DataItem row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataItem {
    pub id: ItemId,
    pub uuid: String,
    pub name: String,
    pub data: String,
}

/// The caller-supplied fields of a DataItem.
///
/// Absent JSON fields decode as empty strings. An `id` in the body is ignored;
/// ids are only ever assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewDataItem {
    pub name: String,
    pub uuid: String,
    pub data: String,
}

impl NewDataItem {
    pub fn new(
        name: impl Into<String>,
        uuid: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            uuid: uuid.into(),
            data: data.into(),
        }
    }

    pub fn into_item(self, id: ItemId) -> DataItem {
        DataItem {
            id,
            uuid: self.uuid,
            name: self.name,
            data: self.data,
        }
    }
}

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row carries the given surrogate key.
    #[error("no dataitem with id {0}")]
    NotFound(ItemId),

    /// A uniqueness or check constraint rejected the write.
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// SQLite failed to execute the statement.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A previous holder of the connection panicked.
    #[error("database connection lock poisoned")]
    Poisoned,
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
