//! SQLite-backed key-value store.
//!
//! A single `kv` table in an on-disk database. The vault encrypts values
//! itself, so the database file is plain SQLite.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use super::traits::KeyValueStore;
use crate::error::{AuraError, Result};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);
";

/// Key-value store persisted in a SQLite database file.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the store at `path`.
    ///
    /// Parent directories are created as needed. On Unix a newly created
    /// database file is restricted to the owner (0600).
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AuraError::Storage(format!(
                        "Failed to create store directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let existed = path.exists();
        let conn = Connection::open(path)?;
        if !existed {
            set_file_permissions(path)?;
        }
        Self::from_connection(conn)
    }

    /// Open a throwaway in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AuraError::Storage("SQLite connection poisoned".to_string()))
    }

    /// Verify the database is readable and the schema is intact.
    pub fn check_integrity(&self) -> Result<()> {
        let conn = self.lock_conn()?;
        let result: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        if result != "ok" {
            return Err(AuraError::Storage(format!(
                "Integrity check failed: {}",
                result
            )));
        }
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock_conn()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            )?;
            for (key, value) in entries {
                stmt.execute(params![key, value])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare("DELETE FROM kv WHERE key = ?1")?;
            for key in keys {
                stmt.execute(params![key])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

fn set_file_permissions(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(path, perms)?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_in_memory_set_get() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn test_remove() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_set_many_is_visible() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set_many(&[("a", "1"), ("b", "2"), ("a", "3")]).unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("3"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));

        store.remove_many(&["a", "b"]).unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap(), None);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("aura.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("k", "durable").unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("durable"));
        store.check_integrity().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("aura.db");
        let _store = SqliteStore::open(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
