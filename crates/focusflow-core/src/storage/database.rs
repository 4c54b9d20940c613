//! SQLite-backed record store.
//!
//! Every collaborator persists one serialized record under a fixed key:
//! timer state, tally, todos, playlist and the audio capability.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::data_dir;
use crate::error::{CoreError, DatabaseError, Result};

/// Record keys in the kv table.
pub mod keys {
    pub const TIMER_STATE: &str = "timer_state";
    pub const TALLY: &str = "tomato_tally";
    pub const TODOS: &str = "todos";
    pub const PLAYLIST: &str = "playlist";
    pub const AUDIO: &str = "audio_capability";
}

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/focusflow.db`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("focusflow.db"))
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key. Returns whether it existed.
    pub fn kv_delete(&self, key: &str) -> Result<bool> {
        let n = self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(n > 0)
    }

    /// Load a JSON record, or `None` if it was never saved.
    ///
    /// A record that no longer parses is logged and treated as missing so a
    /// schema change cannot wedge the host.
    pub fn load_record<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(json) = self.kv_get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&json) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                tracing::warn!(key, "discarding unreadable record: {e}");
                Ok(None)
            }
        }
    }

    /// Load a record or fall back to its default.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        Ok(self.load_record(key)?.unwrap_or_default())
    }

    pub fn save_record<T: Serialize>(&self, key: &str, record: &T) -> Result<()> {
        let json = serde_json::to_string(record)?;
        self.kv_set(key, &json)
    }

    /// Run a read-modify-write of several records in one immediate
    /// transaction, so another process cannot interleave its own.
    ///
    /// Commits when `f` returns `Ok`, rolls back otherwise.
    pub fn exclusive<T, E>(&self, f: impl FnOnce(&Self) -> std::result::Result<T, E>) -> std::result::Result<T, E>
    where
        E: From<CoreError>,
    {
        self.conn
            .execute_batch("BEGIN IMMEDIATE TRANSACTION;")
            .map_err(CoreError::from)?;
        match f(self) {
            Ok(value) => {
                self.conn.execute_batch("COMMIT;").map_err(CoreError::from)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = self.conn.execute_batch("ROLLBACK;") {
                    tracing::warn!("rollback failed: {rollback}");
                }
                Err(e)
            }
        }
    }
}
