//! Key-value store trait definition.
//!
//! The vault persists everything through this flat interface, so any
//! substrate with string keys and string values can back it.

use crate::error::Result;

/// Flat string key-value persistence.
///
/// Implementations must ensure:
/// - `get` after a successful `set` on the same key returns that value
/// - `remove` of a missing key is not an error
/// - Keys are opaque; no prefix or namespace semantics are applied here
pub trait KeyValueStore: Send + Sync {
    /// Read the value for `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Missing keys are ignored.
    fn remove(&self, key: &str) -> Result<()>;

    /// Write several keys.
    ///
    /// The default applies the writes in order. Backends that support
    /// transactions should override this so the writes land together.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Delete several keys.
    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        (**self).set_many(entries)
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        (**self).remove_many(keys)
    }
}
