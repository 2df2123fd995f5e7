//! AES-256-GCM sealing of arbitrary bytes.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;

use super::key::DerivedKey;
use crate::error::{AuraError, Result};

/// Size of the AES-GCM initialization vector in bytes.
pub const IV_LENGTH: usize = 12;

/// Output of a single encryption.
#[derive(Debug, Clone)]
pub struct Sealed {
    /// Fresh random IV, never reused
    pub iv: [u8; IV_LENGTH],
    /// Ciphertext with the 16-byte authentication tag appended
    pub ciphertext: Vec<u8>,
}

/// Encrypt `plaintext` under `key` with a freshly drawn IV.
pub fn seal(key: &DerivedKey, plaintext: &[u8]) -> Result<Sealed> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| AuraError::Crypto(format!("Failed to create cipher: {}", e)))?;

    let mut iv = [0u8; IV_LENGTH];
    OsRng.fill_bytes(&mut iv);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext)
        .map_err(|e| AuraError::Crypto(format!("Encryption failed: {}", e)))?;

    Ok(Sealed { iv, ciphertext })
}

/// Decrypt and authenticate `ciphertext`.
///
/// # Errors
///
/// Returns `AuraError::DecryptionFailed` if the IV has the wrong length or
/// the authentication tag does not verify (wrong key or tampered data).
pub fn open(key: &DerivedKey, iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if iv.len() != IV_LENGTH {
        return Err(AuraError::DecryptionFailed(format!(
            "IV must be {} bytes (got {})",
            IV_LENGTH,
            iv.len()
        )));
    }

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| AuraError::Crypto(format!("Failed to create cipher: {}", e)))?;

    cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|_| AuraError::DecryptionFailed("authentication tag mismatch".to_string()))
}
