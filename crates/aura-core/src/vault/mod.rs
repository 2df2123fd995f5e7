//! PIN-gated persistence of one profile's state document.
//!
//! A [`Vault`] owns the three keys of a single profile (state, security
//! metadata, PIN metadata) and moves between three states:
//!
//! ```text
//!   UnlockedPlaintext --enable_pin--> UnlockedEncrypted
//!   UnlockedEncrypted --disable_pin-> UnlockedPlaintext
//!   Locked            --unlock------> UnlockedEncrypted
//!   any               --reset-------> UnlockedPlaintext
//! ```
//!
//! The derived key lives only in memory. A new `Vault` over a profile with
//! a PIN enabled therefore always starts `Locked`.
//!
//! Every operation holds a per-vault async mutex for its whole duration, so
//! two saves on the same vault can never interleave their writes.

pub mod envelope;

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;
use zeroize::Zeroizing;

use crate::crypto::{derive_key, generate_salt, verifier_of, verify_pin, DerivedKey, KdfParams};
use crate::error::{AuraError, Result};
use crate::profile::{ProfileId, ProfileKeys};
use crate::schema::default_document;
use crate::storage::KeyValueStore;

pub use envelope::{parse_payload, Envelope, Payload, PinMeta, SecurityMeta};
use envelope::{read_pin_meta, read_security_meta};

/// Observable vault state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultState {
    /// No PIN; the document is stored as plain JSON
    UnlockedPlaintext,
    /// PIN enabled and this session holds the key
    UnlockedEncrypted,
    /// PIN enabled and this session does not hold the key
    Locked,
}

impl std::fmt::Display for VaultState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            VaultState::UnlockedPlaintext => "unlocked (no PIN)",
            VaultState::UnlockedEncrypted => "unlocked (encrypted)",
            VaultState::Locked => "locked",
        };
        f.write_str(s)
    }
}

/// How a loaded document came to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Read back from storage
    Stored,
    /// Nothing stored yet; defaults returned
    FirstRun,
    /// Stored payload was not valid JSON; defaults returned
    Recovered { reason: String },
}

/// A document plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub document: Value,
    pub outcome: LoadOutcome,
}

struct Unlocked {
    key: DerivedKey,
    salt: Vec<u8>,
    params: KdfParams,
}

#[derive(Default)]
struct Session {
    unlocked: Option<Unlocked>,
    document: Option<Value>,
}

/// Encrypted-at-rest state for one profile.
pub struct Vault<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
    profile: ProfileId,
    keys: ProfileKeys,
    params: KdfParams,
    session: Mutex<Session>,
}

impl<S: KeyValueStore + ?Sized> Vault<S> {
    /// Open the vault for `profile` with the current KDF parameters.
    pub fn new(store: Arc<S>, profile: ProfileId) -> Self {
        Self::with_params(store, profile, KdfParams::CURRENT)
    }

    /// Open the vault with explicit parameters for new encryptions.
    ///
    /// Existing envelopes are still unlocked with whatever version their
    /// security metadata records.
    pub fn with_params(store: Arc<S>, profile: ProfileId, params: KdfParams) -> Self {
        let keys = profile.keys();
        Self {
            store,
            profile,
            keys,
            params,
            session: Mutex::new(Session::default()),
        }
    }

    pub fn profile(&self) -> &ProfileId {
        &self.profile
    }

    /// Current state, derived from persisted PIN metadata and the session.
    pub async fn state(&self) -> Result<VaultState> {
        let session = self.session.lock().await;
        self.state_of(&session)
    }

    fn state_of(&self, session: &Session) -> Result<VaultState> {
        let pin_enabled = read_pin_meta(self.store.as_ref(), &self.keys.pin)?
            .map(|meta| meta.enabled)
            .unwrap_or(false);
        Ok(match (pin_enabled, session.unlocked.is_some()) {
            (false, _) => VaultState::UnlockedPlaintext,
            (true, true) => VaultState::UnlockedEncrypted,
            (true, false) => VaultState::Locked,
        })
    }

    /// Load the state document.
    ///
    /// # Errors
    ///
    /// - `AuraError::Locked` if a PIN is enabled and not yet entered, or the
    ///   stored payload is encrypted and no key is held
    /// - `AuraError::DecryptionFailed` if the envelope does not decrypt
    pub async fn load(&self) -> Result<Loaded> {
        let mut session = self.session.lock().await;
        if self.state_of(&session)? == VaultState::Locked {
            return Err(AuraError::Locked);
        }
        self.read_document(&mut session)
    }

    /// Persist `document`, encrypting it if a PIN is enabled.
    ///
    /// JSON `null` is rejected with `InvalidInput`: a stored `null` means
    /// "no state" and would load back as a first run.
    pub async fn save(&self, document: &Value) -> Result<()> {
        if document.is_null() {
            return Err(AuraError::InvalidInput(
                "Cannot save a null document".to_string(),
            ));
        }
        let mut session = self.session.lock().await;
        match self.state_of(&session)? {
            VaultState::Locked => Err(AuraError::Locked),
            VaultState::UnlockedPlaintext => {
                let encoded = serde_json::to_string(document)?;
                self.store.set(&self.keys.state, &encoded)?;
                session.document = Some(document.clone());
                tracing::debug!(profile = %self.profile, "saved plaintext state");
                Ok(())
            }
            VaultState::UnlockedEncrypted => {
                let unlocked = session
                    .unlocked
                    .as_ref()
                    .ok_or(AuraError::Locked)?;
                self.write_sealed(unlocked, document, None)?;
                session.document = Some(document.clone());
                tracing::debug!(profile = %self.profile, "saved encrypted state");
                Ok(())
            }
        }
    }

    /// Turn on PIN protection and re-save the document encrypted.
    ///
    /// The profile's salt is reused if one is already stored.
    pub async fn enable_pin(&self, pin: &str) -> Result<()> {
        let mut session = self.session.lock().await;
        let state = self.state_of(&session)?;
        if state != VaultState::UnlockedPlaintext {
            return Err(AuraError::InvalidState(format!(
                "Cannot enable a PIN while {}",
                state
            )));
        }

        let document = self.current_document(&mut session)?;
        let salt = read_security_meta(self.store.as_ref(), &self.keys.security)?
            .and_then(|meta| meta.salt())
            .unwrap_or_else(|| generate_salt().to_vec());

        let key = derive_off_thread(pin, &salt, self.params).await?;
        let unlocked = Unlocked {
            key,
            salt,
            params: self.params,
        };
        let pin_meta = PinMeta::enabled(verifier_of(pin));
        self.write_sealed(&unlocked, &document, Some(&pin_meta))?;

        session.unlocked = Some(unlocked);
        session.document = Some(document);
        tracing::info!(profile = %self.profile, "PIN enabled");
        Ok(())
    }

    /// Turn off PIN protection and store the document as plain JSON.
    pub async fn disable_pin(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        let state = self.state_of(&session)?;
        if state != VaultState::UnlockedEncrypted {
            return Err(AuraError::InvalidState(format!(
                "Cannot disable the PIN while {}",
                state
            )));
        }

        let document = self.current_document(&mut session)?;
        let encoded = serde_json::to_string(&document)?;
        let pin_meta = serde_json::to_string(&PinMeta::disabled())?;
        self.store.set_many(&[
            (self.keys.state.as_str(), encoded.as_str()),
            (self.keys.pin.as_str(), pin_meta.as_str()),
        ])?;

        session.unlocked = None;
        session.document = Some(document);
        tracing::info!(profile = %self.profile, "PIN disabled");
        Ok(())
    }

    /// Enter the PIN for a locked vault.
    ///
    /// # Errors
    ///
    /// - `AuraError::WrongPin` if the PIN does not match the verifier; no
    ///   decryption is attempted
    /// - `AuraError::DecryptionFailed` if the PIN matches but the security
    ///   metadata or envelope is damaged; the vault stays locked
    pub async fn unlock(&self, pin: &str) -> Result<Loaded> {
        let mut session = self.session.lock().await;
        let state = self.state_of(&session)?;
        if state != VaultState::Locked {
            return Err(AuraError::InvalidState(format!(
                "Cannot unlock while {}",
                state
            )));
        }

        let pin_meta = read_pin_meta(self.store.as_ref(), &self.keys.pin)?
            .ok_or(AuraError::WrongPin)?;
        if !verify_pin(pin, &pin_meta.hash) {
            tracing::debug!(profile = %self.profile, "PIN rejected by verifier");
            return Err(AuraError::WrongPin);
        }

        let meta = read_security_meta(self.store.as_ref(), &self.keys.security)?.ok_or_else(
            || {
                AuraError::DecryptionFailed(
                    "Security metadata is missing or unreadable".to_string(),
                )
            },
        )?;
        let params = self.params_for(meta.kdf_version).ok_or_else(|| {
            AuraError::DecryptionFailed(format!("Unknown KDF version {}", meta.kdf_version))
        })?;
        let salt = meta
            .salt()
            .ok_or_else(|| AuraError::DecryptionFailed("Stored salt is invalid".to_string()))?;

        let key = derive_off_thread(pin, &salt, params).await?;

        let raw = self.store.get(&self.keys.state)?;
        let loaded = match parse_payload(raw.as_deref()) {
            Ok(Payload::Sealed(envelope)) => match envelope.open(&key) {
                Ok(document) => Loaded {
                    document,
                    outcome: LoadOutcome::Stored,
                },
                Err(err) => {
                    tracing::warn!(
                        profile = %self.profile,
                        error = %err,
                        "stored state failed to decrypt"
                    );
                    return Err(err);
                }
            },
            Ok(Payload::Plain(document)) => Loaded {
                document,
                outcome: LoadOutcome::Stored,
            },
            Ok(Payload::Missing) => first_run(),
            Err(AuraError::MalformedStorage(reason)) => self.recovered(reason),
            Err(err) => {
                tracing::warn!(
                    profile = %self.profile,
                    error = %err,
                    "stored state failed to decrypt"
                );
                return Err(err);
            }
        };

        session.unlocked = Some(Unlocked { key, salt, params });
        session.document = Some(loaded.document.clone());
        tracing::debug!(profile = %self.profile, "vault unlocked");
        Ok(loaded)
    }

    /// Replace the PIN, keeping the existing salt.
    pub async fn change_pin(&self, current: &str, new: &str) -> Result<()> {
        let mut session = self.session.lock().await;
        let state = self.state_of(&session)?;
        if state != VaultState::UnlockedEncrypted {
            return Err(AuraError::InvalidState(format!(
                "Cannot change the PIN while {}",
                state
            )));
        }

        let stored = read_pin_meta(self.store.as_ref(), &self.keys.pin)?
            .map(|meta| meta.hash)
            .unwrap_or_default();
        if !verify_pin(current, &stored) {
            return Err(AuraError::WrongPin);
        }

        let document = self.current_document(&mut session)?;
        let salt = session
            .unlocked
            .as_ref()
            .map(|u| u.salt.clone())
            .ok_or(AuraError::Locked)?;

        let key = derive_off_thread(new, &salt, self.params).await?;
        let unlocked = Unlocked {
            key,
            salt,
            params: self.params,
        };
        let pin_meta = PinMeta::enabled(verifier_of(new));
        self.write_sealed(&unlocked, &document, Some(&pin_meta))?;

        session.unlocked = Some(unlocked);
        session.document = Some(document);
        tracing::info!(profile = %self.profile, "PIN changed");
        Ok(())
    }

    /// The decrypted document, for export.
    pub async fn export_plain(&self) -> Result<Value> {
        let mut session = self.session.lock().await;
        if self.state_of(&session)? == VaultState::Locked {
            return Err(AuraError::Locked);
        }
        self.current_document(&mut session)
    }

    /// The decrypted document as pretty-printed JSON.
    pub async fn export_json(&self) -> Result<String> {
        let document = self.export_plain().await?;
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Delete every key of this profile and start over without a PIN.
    ///
    /// Works from any state, including `Locked`.
    pub async fn reset(&self) -> Result<Value> {
        let mut session = self.session.lock().await;
        self.store.remove_many(&self.keys.all())?;

        let document = default_document(Utc::now());
        let encoded = serde_json::to_string(&document)?;
        self.store.set(&self.keys.state, &encoded)?;

        session.unlocked = None;
        session.document = Some(document.clone());
        tracing::info!(profile = %self.profile, "profile data reset");
        Ok(document)
    }

    fn params_for(&self, version: u32) -> Option<KdfParams> {
        if version == self.params.version {
            Some(self.params)
        } else {
            KdfParams::for_version(version)
        }
    }

    /// Cached document, or whatever storage holds.
    fn current_document(&self, session: &mut Session) -> Result<Value> {
        if let Some(document) = &session.document {
            return Ok(document.clone());
        }
        Ok(self.read_document(session)?.document)
    }

    fn read_document(&self, session: &mut Session) -> Result<Loaded> {
        let raw = self.store.get(&self.keys.state)?;
        let loaded = match parse_payload(raw.as_deref()) {
            Ok(Payload::Missing) => first_run(),
            Ok(Payload::Plain(document)) => Loaded {
                document,
                outcome: LoadOutcome::Stored,
            },
            Ok(Payload::Sealed(envelope)) => {
                // Unlocked states always hold a key, so a sealed payload without
                // one means the PIN metadata was lost or damaged.
                let unlocked = session.unlocked.as_ref().ok_or_else(|| {
                    tracing::warn!(
                        profile = %self.profile,
                        "encrypted state without enabled PIN metadata"
                    );
                    AuraError::DecryptionFailed(
                        "PIN metadata missing or unreadable for an encrypted payload".to_string(),
                    )
                })?;
                let document = envelope.open(&unlocked.key).map_err(|err| {
                    tracing::warn!(
                        profile = %self.profile,
                        error = %err,
                        "stored state failed to decrypt"
                    );
                    err
                })?;
                Loaded {
                    document,
                    outcome: LoadOutcome::Stored,
                }
            }
            Err(AuraError::MalformedStorage(reason)) => self.recovered(reason),
            Err(err) => return Err(err),
        };
        session.document = Some(loaded.document.clone());
        Ok(loaded)
    }

    fn recovered(&self, reason: String) -> Loaded {
        tracing::warn!(
            profile = %self.profile,
            %reason,
            "stored state is malformed; using defaults"
        );
        Loaded {
            document: default_document(Utc::now()),
            outcome: LoadOutcome::Recovered { reason },
        }
    }

    /// Seal `document` and write it with its security metadata, plus PIN
    /// metadata when given, in one batch.
    fn write_sealed(
        &self,
        unlocked: &Unlocked,
        document: &Value,
        pin_meta: Option<&PinMeta>,
    ) -> Result<()> {
        let envelope = serde_json::to_string(&Envelope::seal(&unlocked.key, document)?)?;
        let security =
            serde_json::to_string(&SecurityMeta::new(&unlocked.salt, unlocked.params))?;
        let pin_meta = pin_meta.map(serde_json::to_string).transpose()?;

        let mut entries = vec![
            (self.keys.state.as_str(), envelope.as_str()),
            (self.keys.security.as_str(), security.as_str()),
        ];
        if let Some(pin_meta) = &pin_meta {
            entries.push((self.keys.pin.as_str(), pin_meta.as_str()));
        }
        self.store.set_many(&entries)
    }
}

fn first_run() -> Loaded {
    Loaded {
        document: default_document(Utc::now()),
        outcome: LoadOutcome::FirstRun,
    }
}

async fn derive_off_thread(pin: &str, salt: &[u8], params: KdfParams) -> Result<DerivedKey> {
    let pin = Zeroizing::new(pin.to_string());
    let salt = salt.to_vec();
    tokio::task::spawn_blocking(move || derive_key(&pin, &salt, params))
        .await
        .map_err(|e| AuraError::Other(format!("Key derivation task failed: {}", e)))?
}
