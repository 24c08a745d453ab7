//! Operator session commands.

use anyhow::{bail, Result};
use serde_json::json;
use sole_cache::Preferences;

use super::{SessionArgs, SessionCommand};
use crate::context::Context;

/// Run the session command.
pub async fn run(args: SessionArgs, ctx: &Context) -> Result<()> {
    match args.command {
        SessionCommand::SetToken { token } => set_token(&token, ctx).await,
        SessionCommand::Clear => clear(ctx).await,
        SessionCommand::Show => show(ctx).await,
        SessionCommand::DarkMode { enabled } => dark_mode(enabled, ctx).await,
    }
}

async fn set_token(token: &str, ctx: &Context) -> Result<()> {
    if token.trim().is_empty() {
        bail!("Token must not be blank");
    }
    let session = ctx.session().await?;
    session.login(token).await?;
    ctx.output.success("Token stored");
    Ok(())
}

async fn clear(ctx: &Context) -> Result<()> {
    let session = ctx.session().await?;
    session.logout().await?;
    ctx.output.success("Signed out");
    Ok(())
}

async fn show(ctx: &Context) -> Result<()> {
    let session = ctx.session().await?;
    let token = session.token().await?;
    let prefs = session.preferences();

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "authenticated": token.is_some(),
            "token": token.as_deref().map(mask_token),
            "dark_mode": prefs.dark_mode,
            "store": ctx.config.store_dir(),
        }));
        return Ok(());
    }

    ctx.output.header("Session");
    match token {
        Some(ref token) => ctx.output.kv("token", &mask_token(token)),
        None => ctx.output.kv("token", "(not signed in)"),
    }
    ctx.output.kv("dark_mode", &prefs.dark_mode.to_string());
    ctx.output.kv("store", &ctx.config.store_dir().display().to_string());
    Ok(())
}

async fn dark_mode(enabled: bool, ctx: &Context) -> Result<()> {
    let mut session = ctx.session().await?;
    let mut prefs: Preferences = session.preferences();
    prefs.dark_mode = enabled;
    session.set_preferences(prefs).await?;
    ctx.output
        .success(&format!("Dark mode {}", if enabled { "on" } else { "off" }));
    Ok(())
}

/// Keep the first and last four characters of a token.
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}
