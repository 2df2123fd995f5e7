//! Boot-time routing: what should the user see first?

use crate::error::{AuraError, Result};
use crate::profile::ProfileId;
use crate::storage::KeyValueStore;
use crate::vault::envelope::{parse_payload, read_pin_meta};

/// Where a client should send the user on startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootDecision {
    /// Nobody is signed in
    SignIn,
    /// Signed in, but the profile has never saved a document
    Onboarding,
    /// PIN enabled and the stored document is encrypted
    Locked,
    Ready,
}

impl std::fmt::Display for BootDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BootDecision::SignIn => "sign-in",
            BootDecision::Onboarding => "onboarding",
            BootDecision::Locked => "locked",
            BootDecision::Ready => "ready",
        };
        f.write_str(s)
    }
}

/// Decide the first screen for `current` without touching any key material.
///
/// A malformed state payload counts as present: the vault will recover it
/// on load, so the profile is `Ready`.
pub fn decide<S: KeyValueStore + ?Sized>(
    store: &S,
    current: Option<&ProfileId>,
) -> Result<BootDecision> {
    let Some(profile) = current else {
        return Ok(BootDecision::SignIn);
    };
    let keys = profile.keys();

    let Some(raw) = store.get(&keys.state)? else {
        return Ok(BootDecision::Onboarding);
    };

    let pin_enabled = read_pin_meta(store, &keys.pin)?
        .map(|meta| meta.enabled)
        .unwrap_or(false);

    let sealed = match parse_payload(Some(&raw)) {
        Ok(payload) => payload.is_sealed(),
        Err(AuraError::DecryptionFailed(_)) => true,
        Err(_) => false,
    };

    if pin_enabled && sealed {
        Ok(BootDecision::Locked)
    } else {
        Ok(BootDecision::Ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KdfParams;
    use crate::storage::MemoryStore;
    use crate::vault::Vault;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_no_profile_signs_in() {
        let store = MemoryStore::new();
        assert_eq!(decide(&store, None).unwrap(), BootDecision::SignIn);
    }

    #[test]
    fn test_no_payload_onboards() {
        let store = MemoryStore::new();
        let alice = ProfileId::new("alice");
        assert_eq!(decide(&store, Some(&alice)).unwrap(), BootDecision::Onboarding);
    }

    #[test]
    fn test_plaintext_is_ready() {
        let store = MemoryStore::new();
        let alice = ProfileId::new("alice");
        store.set(&alice.keys().state, r#"{"v":360}"#).unwrap();
        assert_eq!(decide(&store, Some(&alice)).unwrap(), BootDecision::Ready);

        store.set(&alice.keys().state, "{broken").unwrap();
        assert_eq!(decide(&store, Some(&alice)).unwrap(), BootDecision::Ready);
    }

    #[tokio::test]
    async fn test_pin_profile_is_locked() {
        let store = Arc::new(MemoryStore::new());
        let alice = ProfileId::new("alice");
        let vault = Vault::with_params(store.clone(), alice.clone(), KdfParams::new(1, 1_000));
        vault.save(&json!({ "v": 360 })).await.unwrap();
        vault.enable_pin("1234").await.unwrap();

        assert_eq!(decide(store.as_ref(), Some(&alice)).unwrap(), BootDecision::Locked);

        vault.disable_pin().await.unwrap();
        assert_eq!(decide(store.as_ref(), Some(&alice)).unwrap(), BootDecision::Ready);
    }

    #[test]
    fn test_other_profile_unaffected() {
        let store = MemoryStore::new();
        let alice = ProfileId::new("alice");
        store.set(&alice.keys().state, r#"{"v":360}"#).unwrap();
        let bob = ProfileId::new("bob");
        assert_eq!(decide(&store, Some(&bob)).unwrap(), BootDecision::Onboarding);
    }
}
