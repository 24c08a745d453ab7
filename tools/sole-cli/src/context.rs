//! CLI execution context.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as _, Result};
use sole_cache::{Cache, Session};
use sole_data::{ApiClient, CatalogLoader, ReqwestTransport, TransactionApi};

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file, then apply the environment and URL overrides.
    pub fn load(
        config_path: Option<&str>,
        env: Option<&str>,
        api_url: Option<&str>,
        output: Output,
    ) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let mut config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            Self::find_config(&cwd).unwrap_or_default()
        };

        if let Some(env) = env {
            config = config.for_environment(env)?;
            tracing::debug!(env, "applied environment overrides");
        }
        if let Some(url) = api_url {
            config.api.base_url = url.to_string();
        }
        tracing::debug!(base_url = %config.api.base_url, "configuration loaded");

        Ok(Self { config, output, cwd })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<CliConfig> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some(config);
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Open the local store and the operator session.
    pub async fn session(&self) -> Result<Session> {
        let dir = self.config.store_dir();
        tracing::debug!(dir = %dir.display(), "opening local store");
        let cache = Cache::open(&dir)
            .await
            .with_context(|| format!("Failed to open store: {}", dir.display()))?;
        Ok(Session::init(cache).await?)
    }

    /// API client over HTTP with the stored session.
    pub async fn api_client(&self) -> Result<ApiClient> {
        let transport = ReqwestTransport::new(
            &self.config.api.base_url,
            Duration::from_secs(self.config.api.timeout_secs),
        )?;
        Ok(ApiClient::new(transport, self.session().await?))
    }

    pub async fn catalog_loader(&self) -> Result<CatalogLoader> {
        Ok(CatalogLoader::new(
            self.api_client().await?,
            self.config.catalog_config()?,
        ))
    }

    pub async fn transaction_api(&self) -> Result<TransactionApi> {
        Ok(TransactionApi::new(
            self.api_client().await?,
            self.config.currency()?,
        ))
    }
}
