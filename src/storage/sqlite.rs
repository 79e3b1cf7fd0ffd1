//! SQLite-backed key-value store

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::{path::Path, sync::Mutex};
use tracing::debug;

use super::{KeyValueStore, StorageError, StorageResult};

/// Durable store keeping every key in a single `kv` table
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file at `db_path`
    pub fn open<P: AsRef<Path>>(db_path: P) -> StorageResult<Self> {
        debug!("Opening key-value database at {}", db_path.as_ref().display());
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::ReadFailed(format!("failed to open database: {}", e)))?;
        Self::with_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::ReadFailed(format!("failed to open database: {}", e)))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> StorageResult<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| StorageError::WriteFailed(format!("failed to create kv table: {}", e)))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StorageError::ReadFailed(format!("lock poisoned: {}", e)))?;

        conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
            row.get::<_, String>(0)
        })
        .optional()
        .map_err(|e| StorageError::ReadFailed(format!("{}: {}", key, e)))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StorageError::WriteFailed(format!("lock poisoned: {}", e)))?;

        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )
        .map_err(|e| StorageError::WriteFailed(format!("{}: {}", key, e)))?;

        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StorageError::WriteFailed(format!("lock poisoned: {}", e)))?;

        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(|e| StorageError::WriteFailed(format!("{}: {}", key, e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_set_get_remove() {
        let store = SqliteStore::open_in_memory().unwrap();

        assert_eq!(store.get("agents").unwrap(), None);

        store.set("agents", "[]").unwrap();
        store.set("agents", "[1]").unwrap();
        assert_eq!(store.get("agents").unwrap().as_deref(), Some("[1]"));

        store.remove("agents").unwrap();
        assert_eq!(store.get("agents").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("neuralforge.db");

        {
            let store = SqliteStore::open(&db_path).unwrap();
            store.set("claude_api_key", "sk-test").unwrap();
        }

        let reopened = SqliteStore::open(&db_path).unwrap();
        assert_eq!(
            reopened.get("claude_api_key").unwrap().as_deref(),
            Some("sk-test")
        );
    }
}
