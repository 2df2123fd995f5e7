use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuraConfig {
    pub store: StoreSection,
    #[serde(default)]
    pub profile: ProfileSection,
    #[serde(default)]
    pub ui: UiSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfileSection {
    /// Profile used when nobody is signed in
    pub default: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiSection {
    #[serde(default)]
    pub ascii: bool,
}

impl AuraConfig {
    pub fn new(store_path: PathBuf, default_profile: Option<String>, ascii: bool) -> Self {
        Self {
            store: StoreSection {
                path: store_path.to_string_lossy().to_string(),
            },
            profile: ProfileSection {
                default: default_profile,
            },
            ui: UiSection { ascii },
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_store_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("aura.db"))
}

pub fn read_config(path: &Path) -> anyhow::Result<AuraConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &AuraConfig) -> anyhow::Result<()> {
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    aura_core::fs::write_atomic(path, contents.as_bytes())
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("aura"));
        }
    }
    Ok(home_dir()?.join(".config").join("aura"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("aura"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("aura"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
