use serde_json::json;

use aura_core::{decide, BootDecision, Vault, VaultState};

use crate::app::AppContext;
use crate::cli::JsonArgs;
use crate::ui::{self, Badge};

/// Report the signed-in profile and its lock state without asking for a PIN.
pub async fn handle_status(ctx: &AppContext<'_>, args: &JsonArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json, None);
    let store = ctx.store()?;
    let profile = ctx.current_profile()?;
    let boot = decide(store.as_ref(), profile.as_ref())?;

    let state = match &profile {
        Some(profile) => Some(Vault::new(store.clone(), profile.clone()).state().await?),
        None => None,
    };
    let store_path = ctx.store_path()?.display().to_string();

    if ui_ctx.mode.is_json() {
        let output = json!({
            "store": store_path,
            "profile": profile.as_ref().map(|p| p.as_str()),
            "boot": boot.to_string(),
            "pinEnabled": matches!(state, Some(VaultState::Locked | VaultState::UnlockedEncrypted)),
            "locked": state == Some(VaultState::Locked),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    ui::print(&ui_ctx, &ui::header(&ui_ctx, "status", None));
    ui::blank_line(&ui_ctx);
    ui::print(&ui_ctx, &ui::kv(&ui_ctx, "Store", &store_path));
    ui::print(
        &ui_ctx,
        &ui::kv(
            &ui_ctx,
            "Profile",
            profile.as_ref().map(|p| p.as_str()).unwrap_or("-"),
        ),
    );
    ui::print(&ui_ctx, &ui::kv(&ui_ctx, "Boot", &boot.to_string()));
    if let Some(state) = state {
        ui::print(&ui_ctx, &ui::kv(&ui_ctx, "Vault", &state.to_string()));
    }

    if ui_ctx.mode.is_pretty() && !ctx.quiet() {
        ui::blank_line(&ui_ctx);
        let next = match boot {
            BootDecision::SignIn => Some((
                Badge::Info,
                "Run `aura register <user>` or `aura login <user>`.",
            )),
            BootDecision::Onboarding => Some((
                Badge::Info,
                "Record a first check-in with `aura checkin -m calm`.",
            )),
            BootDecision::Locked => Some((
                Badge::Lock,
                "Enter your PIN when prompted, or set AURA_PIN.",
            )),
            BootDecision::Ready => None,
        };
        if let Some((kind, text)) = next {
            ui::print(&ui_ctx, &ui::badge(&ui_ctx, kind, text));
        }
    }
    Ok(())
}
