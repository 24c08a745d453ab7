//! CLI command implementations.

pub mod catalog;
pub mod config;
pub mod invoice;
pub mod sale;
pub mod scan;
pub mod session;
pub mod transactions;

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use sole_commerce::catalog::Unit;
use sole_commerce::checkout::{CardType, PaymentMethod};
use sole_data::{CatalogLoad, LoadError};

use crate::context::Context;

/// Arguments for the session command.
#[derive(Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Store the bearer token issued by the back office.
    SetToken {
        /// Bearer token.
        token: String,
    },
    /// Forget the stored token.
    Clear,
    /// Show session state.
    Show,
    /// Turn dark mode on or off.
    DarkMode {
        /// on/off, true/false, yes/no.
        #[arg(value_parser = clap::builder::BoolishValueParser::new())]
        enabled: bool,
    },
}

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    /// Search brand or model (at least 2 characters).
    #[arg(short, long)]
    pub search: Option<String>,

    /// Size filter.
    #[arg(long)]
    pub size: Option<String>,

    /// Exact brand, or "all".
    #[arg(short, long, default_value = "all")]
    pub brand: String,

    /// Page to show (1-based).
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Rows per page (default from config).
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Ignore the cached catalog.
    #[arg(short, long)]
    pub refresh: bool,
}

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Scanned text: a unit code or a label URL.
    pub text: String,

    /// Ignore the cached catalog.
    #[arg(short, long)]
    pub refresh: bool,
}

/// Arguments for the sale command.
#[derive(Args)]
pub struct SaleArgs {
    /// Unit codes or scanned label URLs.
    #[arg(short, long = "unit", required = true)]
    pub units: Vec<String>,

    /// Payment method: cash, transfer, qris or card.
    #[arg(long, value_parser = parse_payment_method)]
    pub payment: PaymentMethod,

    /// Card type for card payments: debit or credit.
    #[arg(long, value_parser = parse_card_type)]
    pub card_type: Option<CardType>,

    /// Agreed total; the difference to the subtotal is booked as discount.
    #[arg(long)]
    pub total: Option<String>,

    /// Customer name.
    #[arg(long)]
    pub customer_name: Option<String>,

    /// Customer phone.
    #[arg(long)]
    pub customer_phone: Option<String>,

    /// Customer email.
    #[arg(long)]
    pub customer_email: Option<String>,

    /// Notes printed on the receipt.
    #[arg(long)]
    pub notes: Option<String>,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run (print the payload, submit nothing).
    #[arg(long)]
    pub dry_run: bool,

    /// Ignore the cached catalog.
    #[arg(short, long)]
    pub refresh: bool,
}

/// Arguments for the transactions command.
#[derive(Args)]
pub struct TransactionsArgs {
    /// Page to show (1-based).
    #[arg(short, long, default_value = "1")]
    pub page: u32,
}

/// Arguments for the invoice command.
#[derive(Args)]
pub struct InvoiceArgs {
    /// Transaction timestamp: RFC 3339, "YYYY-MM-DD HH:MM:SS" (UTC) or Unix milliseconds.
    pub timestamp: String,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

fn parse_payment_method(s: &str) -> Result<PaymentMethod, String> {
    PaymentMethod::parse(s).ok_or_else(|| format!("unknown payment method '{}'", s))
}

fn parse_card_type(s: &str) -> Result<CardType, String> {
    CardType::parse(s).ok_or_else(|| format!("unknown card type '{}'", s))
}

/// Load the catalog with a spinner, from cache unless `refresh` is set.
///
/// `search` and `size` are forwarded to the server, which may pre-filter.
pub(crate) async fn load_units(
    ctx: &Context,
    search: Option<&str>,
    size: Option<&str>,
    refresh: bool,
) -> Result<Vec<Unit>> {
    let loader = ctx.catalog_loader().await?;
    let spinner = ctx.output.spinner("Loading catalog...");
    let result = if refresh {
        loader.load_catalog(search, size).await
    } else {
        loader.load_or_cached(search, size).await
    };
    spinner.finish_and_clear();

    match result.map_err(load_error)? {
        CatalogLoad::Loaded(units) => Ok(units),
        CatalogLoad::Empty => {
            ctx.output.warn("No products found");
            Ok(Vec::new())
        }
    }
}

/// Attach a hint to authentication failures.
pub(crate) fn load_error(e: LoadError) -> anyhow::Error {
    match e {
        LoadError::Unauthenticated => {
            anyhow!("Not authenticated. Run `sole session set-token <TOKEN>` first.")
        }
        other => anyhow!(other),
    }
}
