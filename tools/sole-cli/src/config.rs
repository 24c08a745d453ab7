//! CLI configuration.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use sole_commerce::Currency;
use sole_data::{CatalogConfig, RetryPolicy};

/// File names searched for, in order.
pub const CONFIG_NAMES: [&str; 3] = ["sole.toml", ".sole.toml", "sole.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// API connection.
    #[serde(default)]
    pub api: ApiConfig,

    /// Catalog loading.
    #[serde(default)]
    pub catalog: CatalogSettings,

    /// Local storage.
    #[serde(default)]
    pub store: StoreConfig,

    /// Environment-specific overrides.
    #[serde(default)]
    pub environments: HashMap<String, EnvironmentConfig>,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Get environment-specific config.
    pub fn for_environment(&self, env: &str) -> Result<CliConfig> {
        let env_config = self
            .environments
            .get(env)
            .ok_or_else(|| anyhow!("Unknown environment: {}", env))?;

        let mut config = self.clone();
        if let Some(ref api) = env_config.api {
            config.api = api.clone();
        }
        Ok(config)
    }

    /// Currency prices are parsed in.
    pub fn currency(&self) -> Result<Currency> {
        Currency::from_code(&self.api.currency)
            .ok_or_else(|| anyhow!("Unknown currency: {}", self.api.currency))
    }

    /// Settings for the catalog loader.
    pub fn catalog_config(&self) -> Result<CatalogConfig> {
        Ok(CatalogConfig {
            per_page: self.catalog.per_page,
            retry: RetryPolicy::fixed(
                self.catalog.max_attempts,
                Duration::from_millis(self.catalog.retry_delay_ms),
            ),
            cache_ttl: Duration::from_secs(self.catalog.cache_ttl_secs),
            currency: self.currency()?,
        })
    }

    /// Directory of the local store.
    pub fn store_dir(&self) -> PathBuf {
        match &self.store.dir {
            Some(dir) => PathBuf::from(dir),
            None => data_dir().join("sole"),
        }
    }
}

/// API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the back office.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Total request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// ISO currency code of prices.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_currency() -> String {
    "IDR".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            currency: default_currency(),
        }
    }
}

/// Catalog loading settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Products per API page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Attempts per page before the load fails.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause between attempts.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Lifetime of the cached catalog.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Rows per page in `sole catalog`.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_per_page() -> u32 {
    100
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_page_size() -> usize {
    20
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            cache_ttl_secs: default_cache_ttl_secs(),
            page_size: default_page_size(),
        }
    }
}

/// Local storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store directory (default: ~/.local/share/sole).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

/// Environment-specific configuration overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// API config override.
    #[serde(default)]
    pub api: Option<ApiConfig>,
}

/// Get the platform-specific data directory.
fn data_dir() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        PathBuf::from("/tmp")
    }
}

/// Generate a default sole.toml config file.
pub fn generate_default_config() -> String {
    r#"# Register configuration

[api]
base_url = "http://localhost:8000"
timeout_secs = 30
currency = "IDR"

[catalog]
per_page = 100
max_attempts = 3
retry_delay_ms = 1000
cache_ttl_secs = 300
page_size = 20

[store]
# dir = "/var/lib/sole"

[environments.staging]
[environments.staging.api]
base_url = "https://staging.toko.example"

[environments.production]
[environments.production.api]
base_url = "https://toko.example"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_config_parses() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.catalog.max_attempts, 3);
        assert_eq!(config.environments.len(), 2);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: CliConfig = toml::from_str("[api]\nbase_url = \"http://pos.local\"\n").unwrap();
        assert_eq!(config.api.base_url, "http://pos.local");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.catalog.per_page, 100);
        assert_eq!(config.catalog.cache_ttl_secs, 300);
    }

    #[test]
    fn test_environment_override() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        let staging = config.for_environment("staging").unwrap();
        assert_eq!(staging.api.base_url, "https://staging.toko.example");
        assert_eq!(staging.catalog.per_page, 100);
        assert!(config.for_environment("qa").is_err());
    }

    #[test]
    fn test_catalog_config_conversion() {
        let catalog = CliConfig::default().catalog_config().unwrap();
        assert_eq!(catalog.per_page, 100);
        assert_eq!(catalog.retry, RetryPolicy::fixed(3, Duration::from_secs(1)));
        assert_eq!(catalog.cache_ttl, Duration::from_secs(300));
        assert_eq!(catalog.currency, Currency::IDR);
    }

    #[test]
    fn test_unknown_currency() {
        let mut config = CliConfig::default();
        config.api.currency = "XYZ".into();
        assert!(config.catalog_config().is_err());
    }

    #[test]
    fn test_load_json_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sole.json");
        std::fs::write(&path, r#"{ "store": { "dir": "/srv/sole" } }"#).unwrap();

        let config = CliConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.store_dir(), PathBuf::from("/srv/sole"));
        assert_eq!(config.api.currency, "IDR");
    }
}
