//! Local profile registry with password sign-in.
//!
//! The registry is device-local and holds only usernames and Argon2id PHC
//! password hashes. Signing in selects which [`ProfileId`] partition the
//! vault operates on; it does not unlock anything by itself.

use std::sync::Arc;

use aes_gcm::aead::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ProfileId, CURRENT_USER_KEY, USERS_KEY};
use crate::error::{AuraError, Result};
use crate::storage::KeyValueStore;

/// Minimum account password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// One registered profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    /// Normalized username
    pub user: String,
    /// Argon2id PHC string
    pub hash: String,
    /// When the profile was registered
    pub created_at: DateTime<Utc>,
}

/// Registry of profiles known on this device.
pub struct ProfileRegistry<S: KeyValueStore> {
    store: Arc<S>,
}

impl<S: KeyValueStore> ProfileRegistry<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// All registered profiles, in registration order.
    ///
    /// An unreadable registry is treated as empty, matching how the vault
    /// treats malformed payloads.
    pub fn list(&self) -> Result<Vec<ProfileRecord>> {
        let Some(raw) = self.store.get(USERS_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(records) => Ok(records),
            Err(err) => {
                tracing::warn!(error = %err, "profile registry is malformed; treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Register a new profile and make it current.
    ///
    /// # Errors
    ///
    /// - `AuraError::InvalidInput` if the username is blank or reserved, or
    ///   the password is shorter than [`MIN_PASSWORD_LENGTH`]
    /// - `AuraError::ProfileExists` if the username is taken
    pub fn register(&self, user: &str, password: &str) -> Result<ProfileId> {
        if user.trim().is_empty() {
            return Err(AuraError::InvalidInput(
                "Username cannot be empty".to_string(),
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuraError::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let profile = ProfileId::new(user);
        if profile.is_guest() {
            return Err(AuraError::InvalidInput(format!(
                "'{}' is reserved for the signed-out profile",
                profile
            )));
        }
        let mut records = self.list()?;
        if records.iter().any(|r| r.user == profile.as_str()) {
            return Err(AuraError::ProfileExists(profile.to_string()));
        }

        records.push(ProfileRecord {
            user: profile.to_string(),
            hash: hash_password(password)?,
            created_at: Utc::now(),
        });
        let encoded = serde_json::to_string(&records)?;
        self.store.set_many(&[
            (USERS_KEY, encoded.as_str()),
            (CURRENT_USER_KEY, profile.as_str()),
        ])?;

        tracing::info!(profile = %profile, "registered profile");
        Ok(profile)
    }

    /// Check credentials and make the profile current.
    pub fn sign_in(&self, user: &str, password: &str) -> Result<ProfileId> {
        let profile = ProfileId::new(user);
        let records = self.list()?;
        let record = records
            .iter()
            .find(|r| r.user == profile.as_str())
            .ok_or_else(|| AuraError::ProfileNotFound(profile.to_string()))?;

        if !verify_password(password, &record.hash)? {
            return Err(AuraError::InvalidCredentials);
        }

        self.store.set(CURRENT_USER_KEY, profile.as_str())?;
        tracing::debug!(profile = %profile, "signed in");
        Ok(profile)
    }

    /// Forget the current profile.
    pub fn sign_out(&self) -> Result<()> {
        self.store.remove(CURRENT_USER_KEY)
    }

    /// The signed-in profile, if any.
    pub fn current(&self) -> Result<Option<ProfileId>> {
        Ok(self
            .store
            .get(CURRENT_USER_KEY)?
            .filter(|value| !value.trim().is_empty())
            .map(|value| ProfileId::new(&value)))
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuraError::Crypto(format!("Password hashing failed: {}", e)))
}

fn verify_password(password: &str, phc: &str) -> Result<bool> {
    let parsed = PasswordHash::new(phc)
        .map_err(|e| AuraError::Crypto(format!("Stored password hash is invalid: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn registry() -> (Arc<MemoryStore>, ProfileRegistry<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), ProfileRegistry::new(store))
    }

    #[test]
    fn test_register_sets_current() {
        let (_, registry) = registry();
        let profile = registry.register(" Alice ", "secret-pw").unwrap();
        assert_eq!(profile.as_str(), "alice");
        assert_eq!(registry.current().unwrap(), Some(profile));
    }

    #[test]
    fn test_register_duplicate_rejected() {
        let (_, registry) = registry();
        registry.register("alice", "secret-pw").unwrap();
        let result = registry.register("ALICE", "other-pw");
        assert!(matches!(result, Err(AuraError::ProfileExists(_))));
    }

    #[test]
    fn test_register_short_password_rejected() {
        let (_, registry) = registry();
        let result = registry.register("alice", "12345");
        assert!(matches!(result, Err(AuraError::InvalidInput(_))));
    }

    #[test]
    fn test_register_blank_user_rejected() {
        let (_, registry) = registry();
        assert!(matches!(
            registry.register("  ", "secret-pw"),
            Err(AuraError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_register_guest_name_rejected() {
        let (_, registry) = registry();
        assert!(matches!(
            registry.register(" Guest ", "secret-pw"),
            Err(AuraError::InvalidInput(_))
        ));
        assert_eq!(registry.current().unwrap(), None);
    }

    #[test]
    fn test_password_not_stored_in_clear() {
        let (store, registry) = registry();
        registry.register("alice", "secret-pw").unwrap();
        let raw = store.get(USERS_KEY).unwrap().unwrap();
        assert!(!raw.contains("secret-pw"));
        assert!(raw.contains("$argon2id$"));
    }

    #[test]
    fn test_sign_in_flow() {
        let (_, registry) = registry();
        registry.register("alice", "secret-pw").unwrap();
        registry.sign_out().unwrap();
        assert_eq!(registry.current().unwrap(), None);

        assert!(matches!(
            registry.sign_in("alice", "wrong-pw"),
            Err(AuraError::InvalidCredentials)
        ));
        assert!(matches!(
            registry.sign_in("bob", "secret-pw"),
            Err(AuraError::ProfileNotFound(_))
        ));
        assert_eq!(registry.current().unwrap(), None);

        let profile = registry.sign_in("Alice", "secret-pw").unwrap();
        assert_eq!(registry.current().unwrap(), Some(profile));
    }

    #[test]
    fn test_malformed_registry_reads_empty() {
        let (store, registry) = registry();
        store.set(USERS_KEY, "not json").unwrap();
        assert!(registry.list().unwrap().is_empty());
        registry.register("alice", "secret-pw").unwrap();
        assert_eq!(registry.list().unwrap().len(), 1);
    }
}
