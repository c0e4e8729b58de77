//! SQLite cache backend
//!
//! Stores each cache as one row of `snapshot_caches`. The connection sits
//! behind a mutex so the backend is `Send + Sync`.

#![allow(clippy::result_large_err)]

use crate::db;
use crate::errors::{from_rusqlite, persistence_error, Result};
use crate::migrations::apply_migrations;
use fetchdelta_core::cache::CacheBackend;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub struct SqliteCacheBackend {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteCacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteCacheBackend").finish_non_exhaustive()
    }
}

impl SqliteCacheBackend {
    /// Open (or create) the database at `path` and apply migrations
    ///
    /// # Errors
    ///
    /// `Io` if the directory cannot be created, `Persistence` for SQLite or
    /// migration failures.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_connection(db::open(path)?)
    }

    /// In-memory database, mainly for tests
    ///
    /// # Errors
    ///
    /// `Persistence` for SQLite or migration failures.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(db::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self, op: &str, name: &str) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| persistence_error(op, name, "connection mutex poisoned"))
    }
}

impl CacheBackend for SqliteCacheBackend {
    fn read_cache(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let conn = self.lock("read_cache", name)?;
        conn.query_row(
            "SELECT payload FROM snapshot_caches WHERE cache_name = ?1",
            [name],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| from_rusqlite(e).with_cache_name(name))
    }

    fn write_cache(&self, name: &str, payload: &[u8]) -> Result<()> {
        let conn = self.lock("write_cache", name)?;
        let now = chrono::Utc::now().timestamp();
        conn.execute(
            "INSERT INTO snapshot_caches (cache_name, payload, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(cache_name) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at",
            params![name, payload, now],
        )
        .map_err(|e| from_rusqlite(e).with_cache_name(name))?;

        tracing::debug!(cache_name = name, size_bytes = payload.len(), "Wrote cache row");
        Ok(())
    }

    fn delete_cache(&self, name: Option<&str>) -> Result<()> {
        let conn = self.lock("delete_cache", name.unwrap_or("*"))?;
        let removed = match name {
            Some(name) => conn.execute("DELETE FROM snapshot_caches WHERE cache_name = ?1", [name]),
            None => conn.execute("DELETE FROM snapshot_caches", []),
        }
        .map_err(from_rusqlite)?;

        tracing::debug!(removed, "Deleted cache rows");
        Ok(())
    }

    fn cache_names(&self) -> Result<Vec<String>> {
        let conn = self.lock("list_caches", "*")?;
        let mut stmt = conn
            .prepare("SELECT cache_name FROM snapshot_caches ORDER BY cache_name")
            .map_err(from_rusqlite)?;
        let names = stmt
            .query_map([], |row| row.get(0))
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<String>, _>>()
            .map_err(from_rusqlite)?;
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_overwrites_existing_row() {
        let backend = SqliteCacheBackend::open_in_memory().unwrap();
        backend.write_cache("tasks", b"one").unwrap();
        backend.write_cache("tasks", b"two").unwrap();

        assert_eq!(backend.read_cache("tasks").unwrap(), Some(b"two".to_vec()));
        assert_eq!(backend.cache_names().unwrap(), vec!["tasks".to_string()]);
    }

    #[test]
    fn test_delete_missing_row_is_ok() {
        let backend = SqliteCacheBackend::open_in_memory().unwrap();
        backend.delete_cache(Some("absent")).unwrap();
        assert!(backend.read_cache("absent").unwrap().is_none());
    }
}
