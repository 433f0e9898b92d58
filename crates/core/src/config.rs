//! Config file parsing for `~/.config/catalog-seo/config.toml`.
//!
//! `AppConfig` doubles as the adapter's `ConfigStore`, so the lender library
//! setting is read through the same key lookup a host store would serve.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Key of the configured lender library node id.
pub const LENDER_LIBRARY_KEY: &str = "seo.lender_library";

/// Key/value settings lookup injected into the adapter.
pub trait ConfigStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

impl ConfigStore for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub covers: CoversConfig,
    #[serde(default)]
    pub seo: SeoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoversConfig {
    /// Directory holding cached cover files.
    pub root: Option<String>,
    /// Public URL prefix the cover directory is served under.
    pub public_base: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeoConfig {
    /// Node id of the library presented as lender.
    pub lender_library: Option<u64>,
}

impl AppConfig {
    /// Cover directory from config, else the platform data dir.
    pub fn covers_root(&self) -> PathBuf {
        match &self.covers.root {
            Some(root) => PathBuf::from(root),
            None => dirs::data_local_dir()
                .map(|p| p.join("catalog-seo").join("covers"))
                .unwrap_or_else(|| PathBuf::from("./covers")),
        }
    }

    pub fn covers_public_base(&self) -> String {
        match &self.covers.public_base {
            Some(base) => base.clone(),
            None => format!("{}/files/covers", self.site.base_url.trim_end_matches('/')),
        }
    }
}

impl ConfigStore for AppConfig {
    fn get(&self, key: &str) -> Option<String> {
        match key {
            LENDER_LIBRARY_KEY => self.seo.lender_library.map(|nid| nid.to_string()),
            "site.base_url" => Some(self.site.base_url.clone()),
            "covers.root" => self.covers.root.clone(),
            "covers.public_base" => self.covers.public_base.clone(),
            _ => None,
        }
    }
}

/// Load config from the default path (`~/.config/catalog-seo/config.toml`).
/// A missing or malformed file yields defaults.
pub fn load_config() -> AppConfig {
    let Some(path) = config_path() else {
        return AppConfig::default();
    };
    if !path.is_file() {
        return AppConfig::default();
    }
    read_config_file(&path).unwrap_or_else(|e| {
        tracing::warn!("Using default config: {}", e);
        AppConfig::default()
    })
}

/// Strict read: a file that does not parse is an error, not defaults.
pub fn read_config_file(path: &Path) -> Result<AppConfig, CatalogError> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| CatalogError::Config {
        path: path.display().to_string(),
        detail: e.to_string(),
    })
}

/// Write a config file, creating its directory.
pub fn write_config_file(path: &Path, cfg: &AppConfig) -> Result<(), CatalogError> {
    let content = toml::to_string_pretty(cfg).map_err(|e| CatalogError::Config {
        path: path.display().to_string(),
        detail: e.to_string(),
    })?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// Return the default config file path (for init and show).
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut p| {
        p.push("catalog-seo");
        p.push("config.toml");
        p
    })
}

/// Set a dot-separated key (e.g. `seo.lender_library`) on a config.
pub fn set_config_key(cfg: &mut AppConfig, key: &str, value: &str) -> Result<(), String> {
    let parts: Vec<&str> = key.splitn(2, '.').collect();
    match parts.as_slice() {
        ["site", "base_url"] => cfg.site.base_url = value.to_string(),
        ["covers", "root"] => cfg.covers.root = Some(value.to_string()),
        ["covers", "public_base"] => cfg.covers.public_base = Some(value.to_string()),
        ["seo", "lender_library"] => {
            let nid = value
                .parse()
                .map_err(|_| format!("Invalid node id for {}: {}", key, value))?;
            cfg.seo.lender_library = Some(nid);
        }
        _ => return Err(format!("Unknown key: {}", key)),
    }
    Ok(())
}
