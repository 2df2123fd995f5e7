//! PIN verifier.
//!
//! The verifier is a plain SHA-256 digest over a fixed domain tag and the
//! PIN. It deliberately shares no inputs with [`crate::crypto::derive_key`]:
//! no salt, no iteration count. Changing KDF parameters therefore never
//! changes a profile's verifier.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Domain tag mixed into every verifier.
const VERIFIER_DOMAIN: &str = "AURA|PIN|v360|";

/// Compute the verifier for a PIN (44 characters of standard base64).
pub fn verifier_of(pin: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(VERIFIER_DOMAIN.as_bytes());
    hasher.update(pin.as_bytes());
    STANDARD.encode(hasher.finalize())
}

/// Check a PIN against a stored verifier in constant time.
pub fn verify_pin(pin: &str, stored: &str) -> bool {
    let candidate = verifier_of(pin);
    candidate.as_bytes().ct_eq(stored.as_bytes()).into()
}
