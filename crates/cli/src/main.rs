//! Happy Store CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the shop schema and session tables
//! hs-cli migrate
//!
//! # Insert the demo catalog, or products from a JSON file
//! hs-cli seed
//! hs-cli seed --file products.json
//!
//! # Produce a value for ADMIN_PASSWORD_HASH
//! hs-cli admin hash-password
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hs-cli")]
#[command(author, version, about = "Happy Store CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert products into the catalog
    Seed {
        /// JSON array of products; the built-in demo catalog when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Manage the admin account
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Hash a password (read from stdin) for `ADMIN_PASSWORD_HASH`
    HashPassword,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file } => commands::seed::products(file.as_deref()).await?,
        Commands::Admin { action } => match action {
            AdminAction::HashPassword => commands::admin::hash_password()?,
        },
    }
    Ok(())
}
