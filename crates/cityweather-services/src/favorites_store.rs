//! SQLite-based saved-city storage.
//!
//! `SqliteFavoritesStore` keeps the list in a single `locations` table whose
//! `city_name` column is UNIQUE, so duplicate names are rejected by the engine.

use rusqlite::{params, Connection, ErrorCode};
use std::path::Path;

use crate::favorites_backend::{
    validate_city_name, FavoritesBackend, FavoritesBackendError, FavoritesBackendResult, SavedCity,
};

/// SQLite-based saved-city storage.
pub struct SqliteFavoritesStore {
    conn: Connection,
}

impl SqliteFavoritesStore {
    /// Open (or create) the store at the given path.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn new<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize the database schema. Safe to run on every open.
    fn init_schema(&self) -> anyhow::Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS locations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                city_name TEXT NOT NULL UNIQUE
            );
            "#,
        )?;
        // Warm up the connection so the first real query doesn't pay for it
        self.conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0))?;
        Ok(())
    }

    fn row_to_city(row: &rusqlite::Row) -> rusqlite::Result<SavedCity> {
        Ok(SavedCity {
            id: row.get(0)?,
            city_name: row.get(1)?,
        })
    }
}

/// Map a rusqlite error, recognising UNIQUE violations as duplicates.
fn map_sqlite_error(e: rusqlite::Error, city_name: Option<&str>) -> FavoritesBackendError {
    match (&e, city_name) {
        (rusqlite::Error::SqliteFailure(err, _), Some(name))
            if err.code == ErrorCode::ConstraintViolation =>
        {
            FavoritesBackendError::Duplicate(name.to_string())
        }
        _ => FavoritesBackendError::storage(e.to_string()),
    }
}

impl FavoritesBackend for SqliteFavoritesStore {
    fn list(&self) -> FavoritesBackendResult<Vec<SavedCity>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, city_name FROM locations ORDER BY id ASC")
            .map_err(|e| map_sqlite_error(e, None))?;

        let rows = stmt
            .query_map([], Self::row_to_city)
            .map_err(|e| map_sqlite_error(e, None))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlite_error(e, None))
    }

    fn count(&self) -> FavoritesBackendResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM locations", [], |row| row.get(0))
            .map_err(|e| map_sqlite_error(e, None))?;
        Ok(count as usize)
    }

    fn insert(&self, city_name: &str, capacity: usize) -> FavoritesBackendResult<SavedCity> {
        validate_city_name(city_name)?;

        // Count and insert in one transaction; dropping `tx` on an early
        // return rolls it back.
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| map_sqlite_error(e, None))?;

        let count: i64 = tx
            .query_row("SELECT COUNT(*) FROM locations", [], |row| row.get(0))
            .map_err(|e| map_sqlite_error(e, None))?;
        if count as usize >= capacity {
            return Err(FavoritesBackendError::CapacityReached(capacity));
        }

        tx.execute(
            "INSERT INTO locations (city_name) VALUES (?1)",
            params![city_name],
        )
        .map_err(|e| map_sqlite_error(e, Some(city_name)))?;
        let id = tx.last_insert_rowid();

        tx.commit().map_err(|e| map_sqlite_error(e, None))?;

        Ok(SavedCity {
            id,
            city_name: city_name.to_string(),
        })
    }

    fn delete(&self, id: i64) -> FavoritesBackendResult<()> {
        let affected = self
            .conn
            .execute("DELETE FROM locations WHERE id = ?1", params![id])
            .map_err(|e| map_sqlite_error(e, None))?;
        if affected == 0 {
            tracing::debug!(id, "Delete matched no saved city");
        }
        Ok(())
    }
}
