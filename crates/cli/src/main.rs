//! Emporium CLI - Database migrations and catalog seeding.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending storefront migrations
//! emporium-cli migrate
//!
//! # Load products from a YAML file
//! emporium-cli seed --file crates/cli/seed/products.yaml
//!
//! # Validate the file without touching the database
//! emporium-cli seed --file crates/cli/seed/products.yaml --dry-run
//! ```
//!
//! Both commands read `STOREFRONT_DATABASE_URL` (or `DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "emporium-cli")]
#[command(author, version, about = "Emporium CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert catalog products from a YAML file
    Seed {
        /// Path to a YAML list of products
        #[arg(short, long, default_value = "crates/cli/seed/products.yaml")]
        file: PathBuf,

        /// Validate the file and exit without writing
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed { file, dry_run } => commands::seed::products(&file, dry_run).await?,
    }
    Ok(())
}
