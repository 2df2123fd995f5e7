//! Application context for the Aura CLI.
//!
//! Bundles the parsed arguments with the lazily-loaded config and store so
//! handlers don't re-read them or thread them through every call.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use once_cell::unsync::OnceCell;
use serde_json::Value;

use aura_core::schema::migrate;
use aura_core::{LoadOutcome, ProfileId, ProfileRegistry, SqliteStore, Vault, VaultState};

use crate::cli::Cli;
use crate::config::{read_config, AuraConfig};
use crate::errors::CliError;
use crate::ui::{self, Badge, UiContext};

use super::pin::unlock_with_retry;
use super::resolver::{
    missing_store_message, resolve_config_path, resolve_store_path, MISSING_STORE_HINT,
};

/// An unlocked vault and the migrated document it returned.
pub struct OpenProfile {
    pub vault: Vault<SqliteStore>,
    pub document: Value,
}

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<Option<AuraConfig>>,
    store: OnceCell<Arc<SqliteStore>>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
            store: OnceCell::new(),
        }
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Whether prompts may be shown.
    pub fn interactive(&self) -> bool {
        !self.cli.no_input && std::io::stdin().is_terminal()
    }

    /// The config file, if one exists.
    pub fn config(&self) -> anyhow::Result<Option<&AuraConfig>> {
        let config = self.config.get_or_try_init(|| -> anyhow::Result<_> {
            let path = resolve_config_path()?;
            if path.exists() {
                Ok(Some(read_config(&path)?))
            } else {
                Ok(None)
            }
        })?;
        Ok(config.as_ref())
    }

    /// Build a UI context honoring `--ascii`, `--no-color` and `[ui] ascii`.
    pub fn ui_context(&self, json: bool, format: Option<&str>) -> UiContext {
        let config_ascii = self
            .config()
            .ok()
            .flatten()
            .map(|c| c.ui.ascii)
            .unwrap_or(false);
        UiContext::from_env(json, format, self.cli.no_color, self.cli.ascii || config_ascii)
    }

    pub fn store_path(&self) -> anyhow::Result<PathBuf> {
        resolve_store_path(self.cli, self.config()?).ok_or_else(|| {
            CliError::not_found(missing_store_message(None), MISSING_STORE_HINT).into()
        })
    }

    /// Open the existing store.
    pub fn store(&self) -> anyhow::Result<Arc<SqliteStore>> {
        let store = self.store.get_or_try_init(|| -> anyhow::Result<_> {
            let path = self.store_path()?;
            if !path.exists() {
                return Err(
                    CliError::not_found(missing_store_message(Some(&path)), MISSING_STORE_HINT)
                        .into(),
                );
            }
            tracing::debug!(path = %path.display(), "opening store");
            Ok(Arc::new(SqliteStore::open(&path)?))
        })?;
        Ok(store.clone())
    }

    pub fn registry(&self) -> anyhow::Result<ProfileRegistry<SqliteStore>> {
        Ok(ProfileRegistry::new(self.store()?))
    }

    /// The signed-in profile, else the configured default.
    pub fn current_profile(&self) -> anyhow::Result<Option<ProfileId>> {
        if let Some(profile) = self.registry()?.current()? {
            return Ok(Some(profile));
        }
        Ok(self
            .config()?
            .and_then(|c| c.profile.default.as_deref())
            .map(ProfileId::new))
    }

    pub fn require_profile(&self) -> anyhow::Result<ProfileId> {
        self.current_profile()?.ok_or_else(|| {
            CliError::not_found(
                "Not signed in",
                "Run `aura register <user>` or `aura login <user>`.",
            )
            .into()
        })
    }

    pub fn vault(&self) -> anyhow::Result<Vault<SqliteStore>> {
        Ok(Vault::new(self.store()?, self.require_profile()?))
    }

    /// Open the current profile, unlocking it if needed, and bring the
    /// document up to the current schema.
    pub async fn open_profile(&self) -> anyhow::Result<OpenProfile> {
        let vault = self.vault()?;
        let loaded = if vault.state().await? == VaultState::Locked {
            unlock_with_retry(&vault, self.interactive()).await?
        } else {
            vault.load().await?
        };

        if let LoadOutcome::Recovered { reason } = &loaded.outcome {
            let ui_ctx = self.ui_context(false, None);
            eprintln!(
                "{}",
                ui::badge(
                    &ui_ctx,
                    Badge::Warn,
                    &format!("Stored data was unreadable and has been reset ({})", reason)
                )
            );
        }

        let migrated = migrate(&loaded.document, chrono::Utc::now());
        if !migrated.replaced.is_empty() {
            tracing::warn!(fields = ?migrated.replaced, "reset fields with unexpected types");
        }

        Ok(OpenProfile {
            vault,
            document: migrated.document,
        })
    }
}
