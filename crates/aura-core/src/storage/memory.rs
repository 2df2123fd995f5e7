//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::traits::KeyValueStore;
use crate::error::{AuraError, Result};

/// A `HashMap` behind a mutex. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| AuraError::Storage("Memory store lock poisoned".to_string()))
    }

    /// Snapshot of all keys, sorted. Handy for asserting namespacing.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.lock()?.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut map = self.lock()?;
        for (key, value) in entries {
            map.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("nope").unwrap(), None);
    }

    #[test]
    fn test_set_get_overwrite() {
        let store = MemoryStore::new();
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_remove_missing_ok() {
        let store = MemoryStore::new();
        store.remove("nope").unwrap();
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_set_many_and_remove_many() {
        let store = MemoryStore::new();
        store.set_many(&[("a", "1"), ("b", "2")]).unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);
        store.remove_many(&["a", "b", "c"]).unwrap();
        assert!(store.keys().unwrap().is_empty());
    }
}
