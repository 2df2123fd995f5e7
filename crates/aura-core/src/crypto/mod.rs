//! Cryptographic operations for Aura.
//!
//! - **PBKDF2-HMAC-SHA256**: stretches a short PIN into a 256-bit key
//! - **AES-256-GCM**: authenticated encryption of the state document
//! - **SHA-256 verifier**: cheap "is this the right PIN" check that shares
//!   nothing with the key derivation path
//!
//! ## Threat Model
//!
//! We defend against:
//! - Reading another person's check-ins and journal from a copied store
//! - Tampering with the stored ciphertext going unnoticed
//!
//! We do NOT defend against:
//! - Offline brute-force of a 4-8 digit PIN by a determined attacker
//! - Access to an unlocked session / process memory

pub mod cipher;
pub mod key;
pub mod pin;
pub mod verifier;

pub use cipher::{open, seal, Sealed, IV_LENGTH};
pub use key::{derive_key, generate_salt, DerivedKey, KdfParams, KEY_LENGTH, SALT_LENGTH};
pub use pin::validate_pin;
pub use verifier::{verifier_of, verify_pin};
