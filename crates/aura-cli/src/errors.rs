//! CLI error types for structured error handling.
//!
//! Each variant maps to a specific exit code. Core errors are classified
//! with [`CliError::from_core`] so that a wrong PIN and damaged data never
//! look alike to a script.

use std::fmt;

use aura_core::AuraError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug, Clone)]
pub enum CliError {
    /// Resource not found (config, store, profile)
    NotFound { message: String, hint: String },

    /// Invalid user input
    InvalidInput(String),

    /// Authentication failed (wrong PIN or password, too many attempts)
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Vault is locked and no PIN could be obtained
    Locked { hint: String },

    /// PIN verified but the stored data did not decrypt
    Corrupted(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, .. } => write!(f, "{}", message),
            CliError::InvalidInput(message) => write!(f, "{}", message),
            CliError::AuthFailed { message, .. } => write!(f, "{}", message),
            CliError::Locked { .. } => write!(f, "Vault is locked"),
            CliError::Corrupted(detail) => {
                write!(f, "Stored data is damaged and cannot be decrypted ({})", detail)
            }
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Create an AuthFailed error with message and optional hint.
    pub fn auth_failed(message: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: None,
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    pub fn locked(hint: impl Into<String>) -> Self {
        CliError::Locked { hint: hint.into() }
    }

    /// Classify a core error. Errors with no CLI meaning are `None`.
    pub fn from_core(err: &AuraError) -> Option<Self> {
        match err {
            AuraError::WrongPin => Some(CliError::auth_failed("Incorrect PIN.")),
            AuraError::InvalidCredentials => {
                Some(CliError::auth_failed("Incorrect username or password."))
            }
            AuraError::Locked => Some(CliError::locked(format!(
                "Set {} or run in a terminal to enter your PIN.",
                crate::constants::PIN_ENV
            ))),
            AuraError::DecryptionFailed(detail) => Some(CliError::Corrupted(detail.clone())),
            AuraError::ProfileNotFound(name) => Some(CliError::not_found(
                format!("Profile not found: {}", name),
                "Run `aura register <user>` to create it.",
            )),
            AuraError::ProfileExists(name) => Some(CliError::invalid_input(format!(
                "Profile already exists: {}",
                name
            ))),
            AuraError::InvalidInput(message) => Some(CliError::invalid_input(message.clone())),
            AuraError::InvalidState(message) => Some(CliError::invalid_input(message.clone())),
            _ => None,
        }
    }

    /// Hint shown under the error message, if any.
    pub fn hint(&self) -> Option<&str> {
        match self {
            CliError::NotFound { hint, .. } => Some(hint),
            CliError::AuthFailed { hint, .. } => hint.as_deref(),
            CliError::Locked { hint } => Some(hint),
            CliError::Corrupted(_) => {
                Some("Restore from an export or run `aura reset --yes`.")
            }
            CliError::InvalidInput(_) => None,
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::Locked { .. } => exit_codes::LOCKED,
            CliError::Corrupted(_) => exit_codes::CORRUPTED,
        }
    }
}

/// Find the most specific classification for an error chain.
pub fn classify(err: &anyhow::Error) -> Option<CliError> {
    for cause in err.chain() {
        if let Some(cli) = cause.downcast_ref::<CliError>() {
            return Some(cli.clone());
        }
        if let Some(core) = cause.downcast_ref::<AuraError>() {
            if let Some(cli) = CliError::from_core(core) {
                return Some(cli);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_pin_and_corruption_differ() {
        let wrong = CliError::from_core(&AuraError::WrongPin).unwrap();
        let corrupt =
            CliError::from_core(&AuraError::DecryptionFailed("tag".to_string())).unwrap();
        assert_eq!(wrong.exit_code(), exit_codes::AUTH_FAILED);
        assert_eq!(corrupt.exit_code(), exit_codes::CORRUPTED);
        assert_ne!(wrong.to_string(), corrupt.to_string());
    }

    #[test]
    fn test_locked_exit_code() {
        let err = CliError::from_core(&AuraError::Locked).unwrap();
        assert_eq!(err.exit_code(), exit_codes::LOCKED);
        assert!(err.hint().unwrap().contains("AURA_PIN"));
    }

    #[test]
    fn test_storage_errors_unclassified() {
        assert!(CliError::from_core(&AuraError::Storage("disk".to_string())).is_none());
    }

    #[test]
    fn test_classify_through_context() {
        let err = anyhow::Error::new(AuraError::WrongPin).context("while unlocking");
        let cli = classify(&err).unwrap();
        assert_eq!(cli.exit_code(), exit_codes::AUTH_FAILED);

        let err = anyhow::Error::new(CliError::invalid_input("bad"));
        assert_eq!(classify(&err).unwrap().exit_code(), exit_codes::INVALID_INPUT);

        assert!(classify(&anyhow::anyhow!("plain")).is_none());
    }
}
