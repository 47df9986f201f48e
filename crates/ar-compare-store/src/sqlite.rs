//! SQLite implementation of the Storage trait.
//!
//! This is the on-disk backend: the device-local slot that survives process
//! restarts. It uses rusqlite with bundled SQLite, wrapped in async via
//! tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StorageError};
use crate::migration::{self, now_millis};
use crate::traits::Storage;

/// SQLite-based storage implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStorage {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StorageError::Unavailable(format!("connection mutex poisoned: {}", e)))?;
            f(&conn)
        })
        .await
        .map_err(|e| StorageError::Task(format!("spawn_blocking failed: {}", e)))?
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_owned();

        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT value FROM kv_items WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(StorageError::from)
        })
        .await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_owned();
        let value = value.to_owned();

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO kv_items (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at",
                params![key, value, now_millis()],
            )?;
            Ok(())
        })
        .await
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let key = key.to_owned();

        self.with_conn(move |conn| {
            conn.execute("DELETE FROM kv_items WHERE key = ?1", params![key])?;
            Ok(())
        })
        .await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT key FROM kv_items ORDER BY key")?;
            let keys = stmt
                .query_map([], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            Ok(keys)
        })
        .await
    }

    async fn clear(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM kv_items", [])?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get_item() {
        let storage = SqliteStorage::open_memory().unwrap();

        assert_eq!(storage.get_item("ar-compare-comparison").await.unwrap(), None);

        storage
            .set_item("ar-compare-comparison", r#"{"items":[],"maxItems":4}"#)
            .await
            .unwrap();
        assert_eq!(
            storage
                .get_item("ar-compare-comparison")
                .await
                .unwrap()
                .as_deref(),
            Some(r#"{"items":[],"maxItems":4}"#)
        );
    }

    #[tokio::test]
    async fn test_set_item_replaces_value() {
        let storage = SqliteStorage::open_memory().unwrap();

        storage.set_item("slot", "first").await.unwrap();
        storage.set_item("slot", "second").await.unwrap();

        assert_eq!(storage.get_item("slot").await.unwrap().as_deref(), Some("second"));
        assert_eq!(storage.keys().await.unwrap(), vec!["slot".to_string()]);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let storage = SqliteStorage::open_memory().unwrap();
        storage.set_item("a", "1").await.unwrap();
        storage.set_item("b", "2").await.unwrap();
        storage.set_item("c", "3").await.unwrap();

        storage.remove_item("b").await.unwrap();
        storage.remove_item("missing").await.unwrap();
        assert_eq!(
            storage.keys().await.unwrap(),
            vec!["a".to_string(), "c".to_string()]
        );

        storage.clear().await.unwrap();
        assert!(storage.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compare.db");

        {
            let storage = SqliteStorage::open(&path).unwrap();
            storage.set_item("slot", "persisted").await.unwrap();
        }

        let reopened = SqliteStorage::open(&path).unwrap();
        assert_eq!(
            reopened.get_item("slot").await.unwrap().as_deref(),
            Some("persisted")
        );
    }
}
