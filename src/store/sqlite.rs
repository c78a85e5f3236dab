//! SQLite-backed DataItem store.
//!
//! # Responsibilities
//! - Open the database file (or an in-memory database)
//! - Create the `dataitem` table if it is absent
//! - Execute each store operation as a single statement
//!
//! # Design Decisions
//! - One connection shared behind a mutex; SQLite serializes writers anyway
//! - `AUTOINCREMENT` so a deleted row's id is never handed out again
//! - Constraint failures surface as `StoreError::Conflict`, not as I/O errors

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

use crate::config::DatabaseConfig;
use crate::store::types::{DataItem, ItemId, NewDataItem, StoreError, StoreResult};
use crate::store::DataItemStore;

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS dataitem (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uuid TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL CHECK (name <> ''),
    data TEXT NOT NULL DEFAULT ''
)";

const SELECT_SQL: &str = "SELECT id, uuid, name, data FROM dataitem";

/// DataItem store over a single SQLite connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open the database described by `config`, creating the table if needed.
    pub fn open(config: &DatabaseConfig) -> StoreResult<Self> {
        let conn = if config.is_in_memory() {
            Connection::open_in_memory()?
        } else {
            Connection::open(Path::new(&config.path))?
        };
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;

        let store = Self::from_connection(conn)?;
        tracing::info!(
            path = %config.path,
            "DataItem store opened"
        );
        Ok(store)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(CREATE_TABLE_SQL)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl DataItemStore for SqliteStore {
    fn list_all(&self) -> StoreResult<Vec<DataItem>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{SELECT_SQL} ORDER BY id"))?;
        let items = stmt
            .query_map([], row_to_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn find_by_uuid(&self, uuid: &str) -> StoreResult<Option<DataItem>> {
        let conn = self.lock()?;
        let item = conn
            .query_row(
                &format!("{SELECT_SQL} WHERE uuid = ?1 LIMIT 1"),
                params![uuid],
                row_to_item,
            )
            .optional()?;
        Ok(item)
    }

    fn insert(&self, item: NewDataItem) -> StoreResult<DataItem> {
        let conn = self.lock()?;
        let id: ItemId = conn
            .query_row(
                "INSERT INTO dataitem (uuid, name, data) VALUES (?1, ?2, ?3) RETURNING id",
                params![item.uuid, item.name, item.data],
                |row| row.get(0),
            )
            .map_err(constraint_to_conflict)?;
        Ok(item.into_item(id))
    }

    fn update_by_id(&self, id: ItemId, item: NewDataItem) -> StoreResult<DataItem> {
        let conn = self.lock()?;
        let changed = conn
            .execute(
                "UPDATE dataitem SET uuid = ?1, name = ?2, data = ?3 WHERE id = ?4",
                params![item.uuid, item.name, item.data, id],
            )
            .map_err(constraint_to_conflict)?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(item.into_item(id))
    }

    fn delete_by_uuid(&self, uuid: &str) -> StoreResult<bool> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM dataitem WHERE uuid = ?1", params![uuid])?;
        Ok(removed > 0)
    }
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<DataItem> {
    Ok(DataItem {
        id: row.get(0)?,
        uuid: row.get(1)?,
        name: row.get(2)?,
        data: row.get(3)?,
    })
}

fn constraint_to_conflict(err: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(ref failure, ref message) = err {
        if failure.code == ErrorCode::ConstraintViolation {
            return StoreError::Conflict(
                message.clone().unwrap_or_else(|| failure.to_string()),
            );
        }
    }
    StoreError::Sqlite(err)
}
