//! Key derivation using PBKDF2-HMAC-SHA256.
//!
//! Parameter sets are versioned. The version is persisted next to the salt
//! so that raising the iteration count later does not orphan existing
//! ciphertext: old profiles keep deriving with the parameters they were
//! encrypted under until they are re-saved.

use aes_gcm::aead::OsRng;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::ZeroizeOnDrop;

use crate::error::{AuraError, Result};

/// Length of derived key in bytes (32 bytes = 256 bits for AES-256-GCM).
pub const KEY_LENGTH: usize = 32;

/// Length of the per-profile salt in bytes.
pub const SALT_LENGTH: usize = 16;

/// A versioned PBKDF2 parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Version tag persisted in security metadata
    pub version: u32,
    /// PBKDF2 iteration count
    pub iterations: u32,
}

impl KdfParams {
    /// Version 1: 120 000 iterations of HMAC-SHA256.
    pub const V1: KdfParams = KdfParams {
        version: 1,
        iterations: 120_000,
    };

    /// Parameters used for every new encryption.
    pub const CURRENT: KdfParams = Self::V1;

    const KNOWN: &'static [KdfParams] = &[Self::V1];

    /// Build a custom parameter set.
    ///
    /// Intended for tests and benchmarks that cannot afford the production
    /// iteration count.
    pub const fn new(version: u32, iterations: u32) -> Self {
        Self {
            version,
            iterations,
        }
    }

    /// Look up a known parameter set by its persisted version tag.
    pub fn for_version(version: u32) -> Option<KdfParams> {
        Self::KNOWN.iter().copied().find(|p| p.version == version)
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::CURRENT
    }
}

/// A cryptographic key derived from a PIN.
///
/// Key material is zeroized from memory when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Generate a fresh random salt from the OS RNG.
pub fn generate_salt() -> [u8; SALT_LENGTH] {
    let mut salt = [0u8; SALT_LENGTH];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Derive an encryption key from a PIN and salt.
///
/// Same `(pin, salt, params)` always yields the same key, which is what lets
/// the vault re-derive on every unlock without ever persisting the key.
///
/// # Errors
///
/// Returns `AuraError::InvalidInput` if the PIN is empty or the salt is
/// shorter than 16 bytes. PIN *format* (digits, length) is the caller's
/// concern; see [`crate::crypto::validate_pin`].
///
/// # Examples
///
/// ```
/// use aura_core::crypto::{derive_key, KdfParams};
///
/// let params = KdfParams::new(1, 1_000);
/// let key = derive_key("1234", b"unique-salt-16by", params).unwrap();
/// assert_eq!(key.as_bytes().len(), 32);
/// ```
pub fn derive_key(pin: &str, salt: &[u8], params: KdfParams) -> Result<DerivedKey> {
    if pin.is_empty() {
        return Err(AuraError::InvalidInput("PIN cannot be empty".to_string()));
    }

    if salt.len() < SALT_LENGTH {
        return Err(AuraError::InvalidInput(format!(
            "Salt must be at least {} bytes",
            SALT_LENGTH
        )));
    }

    if params.iterations == 0 {
        return Err(AuraError::Crypto(
            "PBKDF2 iteration count must be non-zero".to_string(),
        ));
    }

    let mut key_bytes = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(pin.as_bytes(), salt, params.iterations, &mut key_bytes);

    Ok(DerivedKey::from_bytes(key_bytes))
}
