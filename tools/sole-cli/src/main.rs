//! Sole CLI - Command line register for the footwear point of sale.
//!
//! Commands:
//! - `sole session` - Manage the operator token and preferences
//! - `sole catalog` - Browse the sellable units
//! - `sole scan` - Resolve a scanned unit code or label URL
//! - `sole sale` - Ring up and submit a sale
//! - `sole transactions` - List recorded transactions
//! - `sole invoice` - Format an invoice number
//! - `sole config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::{
    CatalogArgs, ConfigArgs, InvoiceArgs, SaleArgs, ScanArgs, SessionArgs, TransactionsArgs,
};

/// Sole CLI - Run the register from a terminal
#[derive(Parser)]
#[command(name = "sole")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Named environment from the config file
    #[arg(short, long, global = true)]
    env: Option<String>,

    /// Override the API base URL
    #[arg(long, global = true, env = "SOLE_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the operator session
    Session(SessionArgs),

    /// Browse the catalog
    Catalog(CatalogArgs),

    /// Resolve a scanned code
    Scan(ScanArgs),

    /// Ring up and submit a sale
    Sale(SaleArgs),

    /// List recorded transactions
    Transactions(TransactionsArgs),

    /// Format the invoice number for a timestamp
    Invoice(InvoiceArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Already initialised when embedded.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = match context::Context::load(
        cli.config.as_deref(),
        cli.env.as_deref(),
        cli.api_url.as_deref(),
        output.clone(),
    ) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Session(args) => commands::session::run(args, &ctx).await,
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Scan(args) => commands::scan::run(args, &ctx).await,
        Commands::Sale(args) => commands::sale::run(args, &ctx).await,
        Commands::Transactions(args) => commands::transactions::run(args, &ctx).await,
        Commands::Invoice(args) => commands::invoice::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
