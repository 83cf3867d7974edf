//! Catalog store: the durable, queryable collection of city records.
//!
//! A thin wrapper around rusqlite. The connection lives behind a mutex so
//! one store instance can be shared across async tasks; individual calls
//! are short and there is no serializability guarantee across separate
//! calls. Each `insert_batch` runs in its own transaction, so ingestion is
//! atomic per batch, not per run.

use crate::model::City;
use crate::schema::{
    CATALOG_SCHEMA_VERSION, SCHEMA_CREATE_CITIES, SCHEMA_CREATE_INDEXES, SCHEMA_CREATE_METADATA,
    SQL_COUNT, SQL_DELETE_ALL, SQL_INSERT_CITY, SQL_SELECT_ALL, SQL_SELECT_BY_ID,
    SQL_SELECT_BY_PREFIX,
};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during catalog store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("schema version mismatch: expected {expected}, found {found}")]
    SchemaVersionMismatch { expected: String, found: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A connection to the catalog SQLite database
pub struct CatalogStore {
    conn: Mutex<Connection>,
}

impl CatalogStore {
    /// Open (or create) a catalog database at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::configure_connection(&conn)?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory catalog database (for testing)
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::configure_connection(&conn)?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Configure connection settings
    fn configure_connection(conn: &Connection) -> SqliteResult<()> {
        // WAL allows catalog reads during an in-flight ingestion write
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "temp_store", "MEMORY")?;
        Ok(())
    }

    /// Create schema if absent and verify the stored version.
    fn init_schema(&self) -> Result<(), StoreError> {
        {
            let conn = self.conn.lock();
            conn.execute(SCHEMA_CREATE_CITIES, [])?;
            conn.execute(SCHEMA_CREATE_METADATA, [])?;
            conn.execute_batch(SCHEMA_CREATE_INDEXES)?;
        }

        match self.get_metadata("schema_version")? {
            Some(version) if version == CATALOG_SCHEMA_VERSION => Ok(()),
            Some(found) => Err(StoreError::SchemaVersionMismatch {
                expected: CATALOG_SCHEMA_VERSION.to_string(),
                found,
            }),
            None => self.set_metadata("schema_version", CATALOG_SCHEMA_VERSION),
        }
    }

    /// Get a metadata value
    pub fn get_metadata(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.conn.lock();
        let result = conn
            .query_row(
                "SELECT value FROM catalog_metadata WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(result)
    }

    /// Set a metadata value
    pub fn set_metadata(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR REPLACE INTO catalog_metadata (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Upsert a batch of cities inside a single transaction.
    ///
    /// All-or-nothing for this batch: a failure mid-batch rolls the whole
    /// batch back and leaves earlier batches intact.
    pub fn insert_batch(&self, cities: &[City]) -> Result<(), StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(SQL_INSERT_CITY)?;
            for city in cities {
                stmt.execute(params![
                    city.id,
                    city.name,
                    city.country,
                    city.latitude,
                    city.longitude
                ])?;
            }
        }
        tx.commit()?;
        debug!(count = cities.len(), "city batch committed");
        Ok(())
    }

    /// All cities, ordered by (name, country), bounded by `limit`.
    pub fn query_all(&self, limit: usize) -> Result<Vec<City>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(SQL_SELECT_ALL)?;
        let rows = stmt.query_map([limit as i64], Self::row_to_city)?;
        Ok(rows.collect::<SqliteResult<Vec<_>>>()?)
    }

    /// Cities whose name starts with `prefix` (case-insensitive), ordered
    /// by (name, country), bounded by `limit`.
    pub fn query_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<City>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(SQL_SELECT_BY_PREFIX)?;
        let rows = stmt.query_map(params![prefix, limit as i64], Self::row_to_city)?;
        Ok(rows.collect::<SqliteResult<Vec<_>>>()?)
    }

    /// Point lookup by id.
    pub fn query_by_id(&self, id: i64) -> Result<Option<City>, StoreError> {
        let conn = self.conn.lock();
        let result = conn
            .query_row(SQL_SELECT_BY_ID, [id], Self::row_to_city)
            .optional()?;
        Ok(result)
    }

    /// Number of records in the catalog.
    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row(SQL_COUNT, [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Delete every record.
    pub fn clear(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(SQL_DELETE_ALL, [])?;
        Ok(())
    }

    fn row_to_city(row: &Row<'_>) -> SqliteResult<City> {
        Ok(City {
            id: row.get(0)?,
            name: row.get(1)?,
            country: row.get(2)?,
            latitude: row.get(3)?,
            longitude: row.get(4)?,
        })
    }
}
