use std::path::PathBuf;

use aura_core::SqliteStore;

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_store_path, write_config, AuraConfig};
use crate::errors::CliError;
use crate::ui::{self, Badge};

/// Write the config file and create an empty store.
///
/// The store path comes from the positional argument, then `--store`, then
/// the XDG data directory. An existing store is opened, never truncated.
pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false, None);
    let config_path = resolve_config_path()?;
    if config_path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "Config already exists at {} (use --force to overwrite)",
            config_path.display()
        ))
        .into());
    }

    let store_path = match args.path.as_deref().or(ctx.cli().store.as_deref()) {
        Some(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => default_store_path()?,
    };
    let existed = store_path.exists();

    let store = SqliteStore::open(&store_path)?;
    store.check_integrity()?;

    let config = AuraConfig::new(store_path.clone(), args.profile.clone(), ctx.cli().ascii);
    write_config(&config_path, &config)?;
    tracing::info!(store = %store_path.display(), config = %config_path.display(), "initialized");

    if ctx.quiet() {
        return Ok(());
    }
    let store_display = store_path.display().to_string();
    let config_display = config_path.display().to_string();
    let title = if existed {
        "Using existing store"
    } else {
        "Store created"
    };
    ui::print(
        &ui_ctx,
        &ui::receipt(
            &ui_ctx,
            title,
            &[("Store", store_display.as_str()), ("Config", config_display.as_str())],
        ),
    );
    ui::blank_line(&ui_ctx);
    ui::print(
        &ui_ctx,
        &ui::badge(&ui_ctx, Badge::Info, "Next: aura register <user>"),
    );
    Ok(())
}
