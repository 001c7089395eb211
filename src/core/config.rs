use crate::core::goal::Currency;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_FALLBACK_RATE: f64 = 83.0;
pub const DEFAULT_EXCHANGE_RATE_URL: &str = "https://v6.exchangerate-api.com";
pub const API_KEY_ENV: &str = "STASH_EXCHANGE_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExchangeRateProviderConfig {
    #[serde(default = "default_exchange_rate_url")]
    pub base_url: String,
    pub api_key: Option<String>,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for ExchangeRateProviderConfig {
    fn default() -> Self {
        ExchangeRateProviderConfig {
            base_url: default_exchange_rate_url(),
            api_key: None,
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub exchange_rate: ExchangeRateProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_currency")]
    pub currency: Currency,
    #[serde(default = "default_fallback_rate")]
    pub fallback_rate: f64,
    #[serde(default)]
    pub providers: ProvidersConfig,
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            currency: default_currency(),
            fallback_rate: default_fallback_rate(),
            providers: ProvidersConfig::default(),
            data_path: None,
        }
    }
}

fn default_currency() -> Currency {
    Currency::Inr
}

fn default_fallback_rate() -> f64 {
    DEFAULT_FALLBACK_RATE
}

fn default_exchange_rate_url() -> String {
    DEFAULT_EXCHANGE_RATE_URL.to_string()
}

fn default_cache_ttl_secs() -> u64 {
    60 * 60
}

impl AppConfig {
    /// Loads the config from the default location, falling back to defaults when no
    /// file has been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "stash", "stash")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "stash", "stash")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.validate()?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// API key for the exchange rate provider; the environment takes precedence.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.providers.exchange_rate.api_key.clone())
    }

    fn validate(&self) -> Result<()> {
        if !(self.fallback_rate.is_finite() && self.fallback_rate > 0.0) {
            anyhow::bail!(
                "fallback_rate must be a positive number, got {}",
                self.fallback_rate
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
currency: "USD"
fallback_rate: 82.5
data_path: "/tmp/stash"
providers:
  exchange_rate:
    base_url: "http://example.com/rates"
    api_key: "secret"
    cache_ttl_secs: 60
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.currency, Currency::Usd);
        assert_eq!(config.fallback_rate, 82.5);
        assert_eq!(config.data_path.as_deref(), Some("/tmp/stash"));
        assert_eq!(
            config.providers.exchange_rate.base_url,
            "http://example.com/rates"
        );
        assert_eq!(
            config.providers.exchange_rate.api_key.as_deref(),
            Some("secret")
        );
        assert_eq!(config.providers.exchange_rate.cache_ttl_secs, 60);
        assert_eq!(
            config.default_data_path().unwrap(),
            PathBuf::from("/tmp/stash")
        );
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("currency: INR").unwrap();
        assert_eq!(config.currency, Currency::Inr);
        assert_eq!(config.fallback_rate, DEFAULT_FALLBACK_RATE);
        assert!(config.data_path.is_none());
        assert_eq!(
            config.providers.exchange_rate.base_url,
            DEFAULT_EXCHANGE_RATE_URL
        );
        assert!(config.providers.exchange_rate.api_key.is_none());
        assert_eq!(config.providers.exchange_rate.cache_ttl_secs, 3600);
    }

    #[test]
    fn test_config_rejects_bad_currency() {
        let result: Result<AppConfig, _> = serde_yaml::from_str("currency: EUR");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_rejects_non_positive_fallback_rate() -> Result<()> {
        let temp_dir = tempfile::TempDir::new()?;
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(&config_path, "fallback_rate: 0")?;

        let result = AppConfig::load_from_path(&config_path);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("fallback_rate must be a positive number")
        );
        Ok(())
    }
}
