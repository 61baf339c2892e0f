use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::fallback::ProviderId;

/// Environment variable that overrides `default_provider`.
pub const PROVIDER_ENV: &str = "CITY_AGENT_PROVIDER";

/// Configuration for a single fallback provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,

    /// Model override; only used by LLM-backed providers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional default provider id, e.g. "gemini" or "brave".
    pub default_provider: Option<String>,

    /// Example TOML:
    /// [providers.gemini]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Config {
    /// Return the default provider as a strongly-typed ProviderId.
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        let s = self.default_provider.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "No default provider configured.\n\
                 Hint: run `city configure <provider>` (e.g. `city configure gemini`) first."
            )
        })?;

        ProviderId::try_from(s.as_str())
    }

    pub fn provider_config(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id.as_str())
    }

    /// Store default provider as string.
    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    /// Load config from disk and apply environment overrides.
    ///
    /// The result is for answering questions only; saving it would write
    /// environment secrets to disk. Use [`Config::load_for_edit`] to change
    /// the file.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_effective(&path, |name| std::env::var(name).ok())
    }

    /// Config from `path` with the overrides from `lookup` applied.
    pub fn load_effective(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::load_from(path)?;
        cfg.apply_env(lookup);
        Ok(cfg)
    }

    /// Load the file as written, without environment overrides, together with
    /// its path so the edited config can be saved back.
    pub fn load_for_edit() -> Result<(Self, PathBuf)> {
        let path = Self::config_file_path()?;
        let cfg = Self::load_from(&path)?;
        Ok((cfg, path))
    }

    /// Load config from `path`, or return an empty default if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "city-agent", "city-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Overlay API keys and the default provider from the environment.
    ///
    /// Keys from the environment replace keys from the file. `lookup` is
    /// `std::env::var` in production.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for id in ProviderId::all() {
            if let Some(key) = lookup(id.api_key_env()).filter(|k| !k.trim().is_empty()) {
                debug!(provider = %id, "api key taken from {}", id.api_key_env());
                self.upsert_provider_api_key(*id, key.trim().to_string());
            }
        }

        if let Some(provider) = lookup(PROVIDER_ENV).filter(|p| !p.trim().is_empty()) {
            self.default_provider = Some(provider.trim().to_string());
        }
    }

    /// Convenience helper: set/replace a provider API key and optionally set default provider.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers
            .entry(provider_id.as_str().to_string())
            .and_modify(|cfg| cfg.api_key = api_key.clone())
            .or_insert(ProviderConfig { api_key, model: None });

        if self.default_provider.is_none() {
            self.default_provider = Some(provider_id.to_string());
        }
    }

    /// Returns API key for a provider, if present.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.providers.get(provider_id.as_str()).map(|cfg| cfg.api_key.as_str())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some()
    }
}
