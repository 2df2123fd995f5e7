//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, and clap usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure.
    pub const FAILURE: i32 = 1;

    /// Resource not found (config, store, profile).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong PIN or password, too many attempts).
    pub const AUTH_FAILED: i32 = 5;

    /// Vault is locked and no PIN was available.
    pub const LOCKED: i32 = 6;

    /// Stored data failed to decrypt with a verified PIN.
    pub const CORRUPTED: i32 = 7;
}

/// Attempts allowed when prompting for a PIN interactively.
pub const MAX_PIN_ATTEMPTS: u32 = 3;

/// Environment variable holding the PIN for non-interactive use.
pub const PIN_ENV: &str = "AURA_PIN";

/// Environment variable holding the replacement PIN for `pin change`.
pub const NEW_PIN_ENV: &str = "AURA_NEW_PIN";

/// Environment variable holding an account password for non-interactive use.
pub const PASSWORD_ENV: &str = "AURA_PASSWORD";
