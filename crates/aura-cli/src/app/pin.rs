//! PIN and password entry, with retry on a wrong PIN.

use dialoguer::Password;
use zeroize::Zeroizing;

use aura_core::crypto::validate_pin;
use aura_core::{AuraError, KeyValueStore, Loaded, Vault};

use crate::constants::{MAX_PIN_ATTEMPTS, PASSWORD_ENV, PIN_ENV};
use crate::errors::CliError;

fn env_secret(name: &str) -> Option<Zeroizing<String>> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(Zeroizing::new)
}

/// Read an existing PIN from `env`, or prompt for it.
pub fn read_pin(prompt: &str, env: &str, interactive: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Some(pin) = env_secret(env) {
        return Ok(pin);
    }
    if !interactive {
        return Err(CliError::locked(format!(
            "No PIN provided and no TTY available. Set {}.",
            env
        ))
        .into());
    }
    Password::new()
        .with_prompt(prompt)
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read PIN: {}", e))
}

/// Read a new PIN (with confirmation when prompting) and check its format.
pub fn read_new_pin(env: &str, interactive: bool) -> anyhow::Result<Zeroizing<String>> {
    let pin = match env_secret(env) {
        Some(pin) => pin,
        None if interactive => Password::new()
            .with_prompt("New PIN (4-8 digits)")
            .with_confirmation("Confirm PIN", "PINs do not match")
            .interact()
            .map(Zeroizing::new)
            .map_err(|e| anyhow::anyhow!("Failed to read PIN: {}", e))?,
        None => {
            return Err(CliError::invalid_input(format!(
                "No PIN provided and no TTY available. Set {}.",
                env
            ))
            .into())
        }
    };
    validate_pin(&pin)?;
    Ok(pin)
}

/// Read an account password from AURA_PASSWORD, or prompt for it.
pub fn read_password(confirm: bool, interactive: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Some(password) = env_secret(PASSWORD_ENV) {
        return Ok(password);
    }
    if !interactive {
        return Err(CliError::invalid_input(format!(
            "No password provided and no TTY available. Set {}.",
            PASSWORD_ENV
        ))
        .into());
    }
    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    prompt
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Unlock `vault`, retrying a wrong PIN when prompting interactively.
///
/// A PIN from AURA_PIN gets exactly one attempt. Damaged data is reported
/// immediately and never retried.
pub async fn unlock_with_retry<S: KeyValueStore + ?Sized>(
    vault: &Vault<S>,
    interactive: bool,
) -> anyhow::Result<Loaded> {
    if let Some(pin) = env_secret(PIN_ENV) {
        return Ok(vault.unlock(&pin).await?);
    }
    if !interactive {
        return Err(CliError::locked(format!(
            "Set {} or run in a terminal to enter your PIN.",
            PIN_ENV
        ))
        .into());
    }

    let mut attempts: u32 = 0;
    loop {
        attempts += 1;
        let pin = read_pin("PIN", PIN_ENV, interactive)?;
        match vault.unlock(&pin).await {
            Ok(loaded) => return Ok(loaded),
            Err(AuraError::WrongPin) => {
                let remaining = MAX_PIN_ATTEMPTS.saturating_sub(attempts);
                if remaining == 0 {
                    return Err(CliError::auth_failed_with_hint(
                        "Too many failed PIN attempts.",
                        "If you forgot your PIN, `aura reset --yes` deletes this profile's data.",
                    )
                    .into());
                }
                eprintln!(
                    "Incorrect PIN. {} attempt{} remaining.",
                    remaining,
                    if remaining == 1 { "" } else { "s" }
                );
            }
            Err(err) => return Err(err.into()),
        }
    }
}
