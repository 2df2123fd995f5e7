//! Persistence substrate for Aura.
//!
//! Everything the core persists goes through [`KeyValueStore`]: a flat map
//! of string keys to string values. Per-profile partitioning is done by key
//! prefixing (see [`crate::profile::ProfileKeys`]), not by the store.
//!
//! Backends:
//! - [`MemoryStore`]: process-local, for tests and embedding
//! - [`SqliteStore`]: on-device SQLite file, used by the CLI

pub mod memory;
pub mod sqlite;
pub mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::KeyValueStore;
