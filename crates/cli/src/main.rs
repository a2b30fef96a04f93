//! Superball CLI - trigger surface for the supplier synchronization engine.
//!
//! Each subcommand corresponds to one of the integration's invocation
//! points. Order and catalog data live in a JSON store file so the engine
//! can run against fixture data; in production the host platform provides
//! the same collaborators natively. The periodic stock trigger is the host
//! scheduler's job - `stock-schedule` only reports what the settings ask
//! for.
//!
//! # Usage
//!
//! ```bash
//! # Send one order to the supplier
//! superball sync-order 1042
//!
//! # Send every unsent order in an active status
//! superball sync-all
//!
//! # Import new products from the supplier feed
//! superball import-products
//!
//! # Reconcile stock quantities from the feed
//! superball update-stock
//!
//! # Read an order back from the supplier
//! superball show-order SB-900
//!
//! # Print the configured stock update schedule
//! superball stock-schedule
//! ```
//!
//! Configuration comes from `SUPERBALL_*` environment variables (a `.env`
//! file is honored); see the `superball-sync` crate's config module.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod store;

#[derive(Parser)]
#[command(name = "superball")]
#[command(author, version, about = "Superball supplier integration CLI")]
struct Cli {
    /// Path to the JSON order/catalog store file.
    #[arg(long, default_value = "superball-store.json", global = true)]
    store: PathBuf,

    /// Path to the append-only diagnostic log.
    #[arg(long, default_value = "superball-debug.log", global = true)]
    log_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one order to the supplier
    SyncOrder {
        /// Host order id
        id: u64,
    },
    /// Send every unsent order in an active status
    SyncAll,
    /// Import new products from the supplier feed
    ImportProducts,
    /// Reconcile stock quantities from the supplier feed
    UpdateStock,
    /// Read an order back from the supplier
    ShowOrder {
        /// Supplier-assigned order id
        id: String,
    },
    /// Print the configured stock update schedule
    StockSchedule,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let ctx = commands::Context::build(&cli.store, &cli.log_file)?;
    match cli.command {
        Commands::SyncOrder { id } => commands::orders::sync_order(&ctx, id).await,
        Commands::SyncAll => commands::orders::sync_all(&ctx).await,
        Commands::ImportProducts => commands::feed::import_products(&ctx).await,
        Commands::UpdateStock => commands::feed::update_stock(&ctx).await,
        Commands::ShowOrder { id } => commands::orders::show_order(&ctx, &id).await,
        Commands::StockSchedule => commands::settings::stock_schedule(&ctx),
    }
}
