//! Path resolution for config and store files.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, AuraConfig};

/// Resolve the config file path, checking AURA_CONFIG first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("AURA_CONFIG") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the store path from `--store`/AURA_STORE, then the config.
///
/// `None` means neither is set.
pub fn resolve_store_path(cli: &Cli, config: Option<&AuraConfig>) -> Option<PathBuf> {
    if let Some(path) = cli.store.as_deref().filter(|p| !p.trim().is_empty()) {
        return Some(PathBuf::from(path));
    }
    config.map(|c| PathBuf::from(&c.store.path))
}

/// Error message when no store exists yet.
pub fn missing_store_message(path: Option<&Path>) -> String {
    match path {
        Some(path) => format!("No Aura store found at {}", path.display()),
        None => "No Aura store configured".to_string(),
    }
}

/// Hint shown with [`missing_store_message`].
pub const MISSING_STORE_HINT: &str =
    "Run:\n  aura init\n\nOr point at a store:\n  AURA_STORE=/path/to/aura.db aura init";
