use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use dialoguer::Confirm;

use aura_core::fs::write_atomic;

use crate::app::AppContext;
use crate::cli::{Cli, ExportArgs, ResetArgs};
use crate::errors::CliError;
use crate::ui::{self, Badge};

/// Write the decrypted document as JSON to stdout or `--output`.
pub async fn handle_export(ctx: &AppContext<'_>, args: &ExportArgs) -> anyhow::Result<()> {
    let open = ctx.open_profile().await?;
    let json = open.vault.export_json().await?;

    let Some(output) = args.output.as_deref() else {
        println!("{}", json);
        return Ok(());
    };

    let path = Path::new(output);
    write_atomic(path, json.as_bytes())?;
    tracing::info!(path = %path.display(), "exported profile");

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        ui::print(
            &ui_ctx,
            &ui::receipt(&ui_ctx, "Exported", &[("Path", output)]),
        );
        ui::print(
            &ui_ctx,
            &ui::hint(&ui_ctx, "The export is not encrypted. Store it somewhere safe."),
        );
    }
    Ok(())
}

/// Delete the current profile's data. Works while locked, so a forgotten
/// PIN can always be recovered from by starting over.
pub async fn handle_reset(ctx: &AppContext<'_>, args: &ResetArgs) -> anyhow::Result<()> {
    let vault = ctx.vault()?;

    if !args.yes {
        if !ctx.interactive() {
            return Err(CliError::invalid_input(
                "Refusing to reset without confirmation. Pass --yes.",
            )
            .into());
        }
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete all data for {}? This cannot be undone.",
                vault.profile()
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            return Err(CliError::invalid_input("Reset cancelled").into());
        }
    }

    vault.reset().await?;

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        ui::print(
            &ui_ctx,
            &ui::badge(
                &ui_ctx,
                Badge::Warn,
                &format!("All data for {} was deleted. The PIN is off.", vault.profile()),
            ),
        );
    }
    Ok(())
}

pub fn handle_completions(shell: Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "aura", &mut std::io::stdout());
    Ok(())
}
