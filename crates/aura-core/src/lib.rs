//! # Aura Core
//!
//! Local, PIN-gated persistence for the Aura wellness tracker.
//!
//! Everything lives on the device. A profile's state document is stored as
//! plain JSON until the user sets a PIN; from then on it is sealed with
//! AES-256-GCM under a key stretched from the PIN with PBKDF2, and the key
//! exists only in memory for the life of an unlocked session.
//!
//! ## Architecture
//!
//! - **crypto**: key derivation, PIN verifier, authenticated encryption
//! - **storage**: flat key-value trait with memory and SQLite backends
//! - **profile**: profile identity, key namespacing, local sign-in
//! - **vault**: the per-profile state machine (plaintext / encrypted / locked)
//! - **gate**: boot-time decision of which flow to show
//! - **schema**: default document, migration, check-in and journal helpers
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use aura_core::{crypto::KdfParams, MemoryStore, ProfileId, Vault, VaultState};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = Arc::new(MemoryStore::new());
//! let vault = Vault::with_params(store.clone(), ProfileId::new("ada"), KdfParams::new(1, 1_000));
//!
//! let mut doc = vault.load().await.unwrap().document;
//! doc["name"] = "Ada".into();
//! vault.save(&doc).await.unwrap();
//! vault.enable_pin("2468").await.unwrap();
//!
//! let relaunched = Vault::with_params(store, ProfileId::new("ada"), KdfParams::new(1, 1_000));
//! assert_eq!(relaunched.state().await.unwrap(), VaultState::Locked);
//! assert_eq!(relaunched.unlock("2468").await.unwrap().document["name"], "Ada");
//! # });
//! ```

pub mod crypto;
pub mod error;
pub mod fs;
pub mod gate;
pub mod profile;
pub mod schema;
pub mod storage;
pub mod vault;

pub use error::{AuraError, Result};
pub use gate::{decide, BootDecision};
pub use profile::{ProfileId, ProfileKeys, ProfileRegistry};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use vault::{LoadOutcome, Loaded, Vault, VaultState};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
