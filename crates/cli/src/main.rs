//! Qamar CLI - Database migrations and catalog seeding.
//!
//! # Usage
//!
//! ```bash
//! # Create the store schema, tables and session table
//! qamar-cli migrate
//!
//! # Load products and promo codes from a YAML catalog
//! qamar-cli seed --file seeds/catalog.yaml
//! ```
//!
//! Both commands read `ADMIN_DATABASE_URL` (falling back to `DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "qamar-cli")]
#[command(author, version, about = "Qamar Scarves admin CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed products and promo codes from a YAML file
    Seed {
        /// Path to the catalog YAML file
        #[arg(short, long, default_value = "seeds/catalog.yaml")]
        file: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file } => commands::seed::catalog(&file).await?,
    }
    Ok(())
}
