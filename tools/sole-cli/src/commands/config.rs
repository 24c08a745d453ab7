//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");

    // API section
    ctx.output.info("[api]");
    ctx.output.kv("base_url", &ctx.config.api.base_url);
    ctx.output.kv("timeout_secs", &ctx.config.api.timeout_secs.to_string());
    ctx.output.kv("currency", &ctx.config.api.currency);

    // Catalog section
    let catalog = &ctx.config.catalog;
    ctx.output.info("[catalog]");
    ctx.output.kv("per_page", &catalog.per_page.to_string());
    ctx.output.kv("max_attempts", &catalog.max_attempts.to_string());
    ctx.output.kv("retry_delay_ms", &catalog.retry_delay_ms.to_string());
    ctx.output.kv("cache_ttl_secs", &catalog.cache_ttl_secs.to_string());
    ctx.output.kv("page_size", &catalog.page_size.to_string());

    // Store section
    ctx.output.info("[store]");
    ctx.output
        .kv("dir", &ctx.config.store_dir().display().to_string());

    // Environments
    if !ctx.config.environments.is_empty() {
        ctx.output.info("Environments:");
        let mut names: Vec<&String> = ctx.config.environments.keys().collect();
        names.sort();
        for env in names {
            ctx.output.list_item(env);
        }
    }

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("sole.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check_config(&ctx.config);

    // Print results
    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Collect errors and warnings for a configuration.
fn check_config(config: &CliConfig) -> (Vec<String>, Vec<String>) {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let base_url = &config.api.base_url;
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        errors.push(format!("api.base_url '{}' must start with http:// or https://", base_url));
    } else if base_url.starts_with("http://")
        && !base_url.contains("localhost")
        && !base_url.contains("127.0.0.1")
    {
        warnings.push("api.base_url sends the session token over plain http".to_string());
    }

    if config.api.timeout_secs == 0 {
        errors.push("api.timeout_secs must be at least 1".to_string());
    }

    if config.currency().is_err() {
        errors.push(format!("api.currency '{}' is not supported", config.api.currency));
    }

    if config.catalog.per_page == 0 {
        errors.push("catalog.per_page must be at least 1".to_string());
    }

    if config.catalog.max_attempts == 0 {
        errors.push("catalog.max_attempts must be at least 1".to_string());
    }

    if config.catalog.page_size == 0 {
        errors.push("catalog.page_size must be at least 1".to_string());
    }

    if config.catalog.cache_ttl_secs == 0 {
        warnings.push("catalog.cache_ttl_secs is 0; every command reloads the catalog".to_string());
    }

    for (name, env) in &config.environments {
        if let Some(ref api) = env.api {
            if !api.base_url.starts_with("http://") && !api.base_url.starts_with("https://") {
                errors.push(format!(
                    "environments.{}.api.base_url must start with http:// or https://",
                    name
                ));
            }
        }
    }

    (errors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        let (errors, warnings) = check_config(&config);
        assert!(errors.is_empty(), "{:?}", errors);
        assert!(warnings.is_empty(), "{:?}", warnings);
    }

    #[test]
    fn test_invalid_values_reported() {
        let mut config = CliConfig::default();
        config.api.base_url = "pos.local".into();
        config.api.currency = "XYZ".into();
        config.catalog.max_attempts = 0;

        let (errors, _) = check_config(&config);
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("max_attempts")));
    }

    #[test]
    fn test_plain_http_remote_warns() {
        let mut config = CliConfig::default();
        config.api.base_url = "http://toko.example".into();

        let (errors, warnings) = check_config(&config);
        assert!(errors.is_empty());
        assert_eq!(warnings.len(), 1);
    }
}
