//! PREFACE CLI - operator tools for the storefront.
//!
//! # Usage
//!
//! ```bash
//! # Hash the admin password for ADMIN_PASSWORD_HASH (reads the password from stdin)
//! preface-cli admin hash-password
//!
//! # Validate a catalog file before pointing STOREFRONT_CATALOG_PATH at it
//! preface-cli catalog check crates/storefront/data/catalog.json
//!
//! # Track an order against a running storefront
//! preface-cli order track ORD-20251020-8K2M4Q --base-url http://127.0.0.1:3000
//! ```
//!
//! # Commands
//!
//! - `admin hash-password` - Produce an Argon2id PHC string
//! - `catalog check` - Validate a catalog JSON file
//! - `order track` - Show an order's tracking timeline

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "preface-cli")]
#[command(author, version, about = "PREFACE storefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the admin login
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Work with catalog files
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Look up orders on a running storefront
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Hash a password for `ADMIN_PASSWORD_HASH`; the password is read from stdin
    HashPassword,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Validate a catalog JSON file and summarize it
    Check {
        /// Path to the catalog file
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// Show an order's status and tracking timeline
    Track {
        /// Order number, e.g. ORD-20251020-8K2M4Q
        order_number: String,

        /// Storefront base URL (defaults to `STOREFRONT_BASE_URL`)
        #[arg(long, env = "STOREFRONT_BASE_URL", default_value = "http://127.0.0.1:3000")]
        base_url: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

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
        Commands::Admin { action } => match action {
            AdminAction::HashPassword => commands::admin::hash_password()?,
        },
        Commands::Catalog { action } => match action {
            CatalogAction::Check { path } => {
                commands::catalog::check(&path)?;
            }
        },
        Commands::Order { action } => match action {
            OrderAction::Track { order_number, base_url } => {
                commands::order::track(&base_url, &order_number).await?;
            }
        },
    }
    Ok(())
}
