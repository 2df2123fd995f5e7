//! Turning PIN protection on, off, and rotating the PIN.

use aura_core::VaultState;

use crate::app::{read_new_pin, read_pin, AppContext};
use crate::constants::{NEW_PIN_ENV, PIN_ENV};
use crate::errors::CliError;
use crate::ui::{self, Badge};

/// Enable a PIN on a profile that has none. The new PIN is read from
/// AURA_PIN or prompted for twice.
pub async fn handle_pin_set(ctx: &AppContext<'_>) -> anyhow::Result<()> {
    let vault = ctx.vault()?;
    if vault.state().await? != VaultState::UnlockedPlaintext {
        return Err(CliError::invalid_input(
            "A PIN is already set. Use `aura pin change` to replace it.",
        )
        .into());
    }

    let open = ctx.open_profile().await?;
    let pin = read_new_pin(PIN_ENV, ctx.interactive())?;
    // Persist the migrated document so the sealed copy is current.
    open.vault.save(&open.document).await?;
    open.vault.enable_pin(&pin).await?;

    done(ctx, Badge::Lock, "PIN enabled. Your data is now encrypted at rest.");
    Ok(())
}

pub async fn handle_pin_remove(ctx: &AppContext<'_>) -> anyhow::Result<()> {
    let open = ctx.open_profile().await?;
    if open.vault.state().await? != VaultState::UnlockedEncrypted {
        return Err(CliError::invalid_input("No PIN is set.").into());
    }
    open.vault.disable_pin().await?;

    done(ctx, Badge::Warn, "PIN removed. Your data is stored unencrypted.");
    Ok(())
}

/// Replace the PIN. The current PIN comes from AURA_PIN, the new one from
/// AURA_NEW_PIN, or both are prompted for.
pub async fn handle_pin_change(ctx: &AppContext<'_>) -> anyhow::Result<()> {
    let vault = ctx.vault()?;
    if vault.state().await? != VaultState::Locked {
        return Err(CliError::invalid_input(
            "No PIN is set. Use `aura pin set` to add one.",
        )
        .into());
    }

    let interactive = ctx.interactive();
    let current = read_pin("Current PIN", PIN_ENV, interactive)?;
    vault.unlock(&current).await?;
    let new = read_new_pin(NEW_PIN_ENV, interactive)?;
    vault.change_pin(&current, &new).await?;

    done(ctx, Badge::Ok, "PIN changed.");
    Ok(())
}

fn done(ctx: &AppContext, kind: Badge, message: &str) {
    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        ui::print(&ui_ctx, &ui::badge(&ui_ctx, kind, message));
    }
}
