//! Error types for Aura core operations.
//!
//! The first four variants are the vault's public taxonomy. Callers must
//! not conflate `WrongPin` with `DecryptionFailed`: the former is a user
//! mistake, the latter means the stored data is damaged.

use thiserror::Error;

/// Result type alias for Aura operations.
pub type Result<T> = std::result::Result<T, AuraError>;

/// Core error type for Aura operations.
#[derive(Debug, Error)]
pub enum AuraError {
    /// PIN protection is enabled but no verified PIN is held this session
    #[error("Vault is locked")]
    Locked,

    /// The supplied PIN does not match the stored verifier
    #[error("Incorrect PIN")]
    WrongPin,

    /// The PIN verified but the stored envelope could not be decrypted
    #[error("Stored data could not be decrypted: {0}")]
    DecryptionFailed(String),

    /// The persisted plaintext payload is not valid JSON
    #[error("Malformed storage: {0}")]
    MalformedStorage(String),

    /// Operation not valid from the vault's current state
    #[error("Invalid vault state: {0}")]
    InvalidState(String),

    /// Encryption or key derivation error
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// Profile already registered on this device
    #[error("Profile already exists: {0}")]
    ProfileExists(String),

    /// Profile not registered on this device
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// Password did not match the registered profile
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Generic error (fallback)
    #[error("{0}")]
    Other(String),
}
