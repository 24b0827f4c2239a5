use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use crate::provider::ProviderId;

/// Environment variable that supplies (or overrides) the OpenWeather API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Configuration for a single provider (e.g., API key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Remote geocoding service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Nominatim's usage policy requires an identifying User-Agent.
    pub user_agent: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            timeout_secs: 5,
            user_agent: concat!("weatherdash/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl GeocoderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Simulated latency window of the mock provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    pub latency_min_ms: u64,
    pub latency_max_ms: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            latency_min_ms: 800,
            latency_max_ms: 1200,
        }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional default provider id, "mock" or "openweather".
    pub default_provider: Option<String>,

    /// Example TOML:
    /// [providers.openweather]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    #[serde(default)]
    pub geocoder: GeocoderConfig,

    #[serde(default)]
    pub mock: MockConfig,

    /// OpenWeather key taken from the environment; never written to disk.
    #[serde(skip)]
    env_api_key: Option<String>,
}

impl Config {
    /// Provider to use: the explicit default if set, otherwise OpenWeather
    /// when a key is available and the mock provider when it is not.
    pub fn effective_provider_id(&self) -> Result<ProviderId> {
        match &self.default_provider {
            Some(s) => ProviderId::try_from(s.as_str()),
            None if self.is_provider_configured(ProviderId::OpenWeather) => {
                Ok(ProviderId::OpenWeather)
            }
            None => Ok(ProviderId::Mock),
        }
    }

    /// Store default provider as string.
    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    /// Config file merged with the process environment.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_file()?;
        cfg.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        if cfg.mock.latency_min_ms > cfg.mock.latency_max_ms {
            return Err(anyhow!(
                "mock.latency_min_ms ({}) is greater than mock.latency_max_ms ({})",
                cfg.mock.latency_min_ms,
                cfg.mock.latency_max_ms
            ));
        }
        Ok(cfg)
    }

    /// Overlay values from the environment; `lookup` is `std::env::var` in
    /// production. Blank values are ignored. The overlay lives only in
    /// memory, `save` never persists it.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.env_api_key = Some(key.trim().to_string());
        }
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(&path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// File contents `save` writes.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherdash", "weatherdash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Convenience helper: set/replace a provider API key and optionally set default provider.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers.insert(provider_id.as_str().to_string(), ProviderConfig { api_key });

        if self.default_provider.is_none() {
            self.default_provider = Some(provider_id.to_string());
        }
    }

    /// Returns API key for a provider, if present. The environment wins
    /// over the file.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        match (provider_id, self.env_api_key.as_deref()) {
            (ProviderId::OpenWeather, Some(key)) => Some(key),
            _ => self.providers.get(provider_id.as_str()).map(|cfg| cfg.api_key.as_str()),
        }
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderId;

    #[test]
    fn empty_config_selects_mock() {
        let cfg = Config::default();
        assert_eq!(cfg.effective_provider_id().unwrap(), ProviderId::Mock);
    }

    #[test]
    fn env_key_selects_openweather() {
        let mut cfg = Config::default();
        cfg.apply_env(|k| (k == API_KEY_ENV).then(|| "ENV_KEY".to_string()));

        assert_eq!(cfg.effective_provider_id().unwrap(), ProviderId::OpenWeather);
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("ENV_KEY"));
    }

    #[test]
    fn env_key_overrides_file_key() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "FILE_KEY".into());
        cfg.apply_env(|_| Some("ENV_KEY".to_string()));

        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("ENV_KEY"));
    }

    #[test]
    fn env_key_is_never_serialized() {
        let mut cfg = Config::default();
        cfg.apply_env(|_| Some("ENV_SECRET".to_string()));
        cfg.set_default_provider(ProviderId::Mock);

        let text = cfg.to_toml().unwrap();
        assert!(!text.contains("ENV_SECRET"), "{text}");

        let back = Config::from_toml(&text).unwrap();
        assert!(!back.is_provider_configured(ProviderId::OpenWeather));
    }

    #[test]
    fn env_overlay_keeps_file_key_on_save() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "FILE_KEY".into());
        cfg.apply_env(|_| Some("ENV_SECRET".to_string()));

        let text = cfg.to_toml().unwrap();
        assert!(text.contains("FILE_KEY"));
        assert!(!text.contains("ENV_SECRET"));
    }

    #[test]
    fn blank_env_key_is_ignored() {
        let mut cfg = Config::default();
        cfg.apply_env(|_| Some("   ".to_string()));
        assert!(!cfg.is_provider_configured(ProviderId::OpenWeather));
    }

    #[test]
    fn explicit_mock_wins_over_key() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());
        cfg.set_default_provider(ProviderId::Mock);

        assert_eq!(cfg.effective_provider_id().unwrap(), ProviderId::Mock);
    }

    #[test]
    fn unknown_default_provider_errors() {
        let cfg = Config {
            default_provider: Some("nope".into()),
            ..Config::default()
        };
        let err = cfg.effective_provider_id().unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn upsert_does_not_override_existing_default() {
        let mut cfg = Config::default();

        cfg.set_default_provider(ProviderId::Mock);
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());

        assert_eq!(cfg.effective_provider_id().unwrap(), ProviderId::Mock);
        assert!(cfg.is_provider_configured(ProviderId::OpenWeather));
    }

    #[test]
    fn parses_toml_with_defaults() {
        let cfg = Config::from_toml(
            r#"
            default_provider = "openweather"

            [providers.openweather]
            api_key = "abc"

            [geocoder]
            timeout_secs = 2
            "#,
        )
        .unwrap();

        assert_eq!(cfg.effective_provider_id().unwrap(), ProviderId::OpenWeather);
        assert_eq!(cfg.geocoder.timeout(), Duration::from_secs(2));
        assert_eq!(cfg.geocoder.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(cfg.mock, MockConfig::default());
    }

    #[test]
    fn rejects_inverted_latency_window() {
        let err = Config::from_toml("[mock]\nlatency_min_ms = 900\nlatency_max_ms = 100\n")
            .unwrap_err();
        assert!(err.to_string().contains("latency_min_ms"));
    }

    #[test]
    fn toml_roundtrip_preserves_providers() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "K".into());
        let text = cfg.to_toml().unwrap();
        let back = Config::from_toml(&text).unwrap();
        assert_eq!(back.provider_api_key(ProviderId::OpenWeather), Some("K"));
    }
}
