//! JOLANANAS CLI - Database migrations and inspection tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply storefront database migrations
//! jolananas-cli migrate
//!
//! # Print the shipping table for a country, with a quote
//! jolananas-cli shipping --country BE --subtotal 42.50
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;

#[derive(Parser)]
#[command(name = "jolananas-cli")]
#[command(author, version, about = "JOLANANAS CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply storefront database migrations
    Migrate,
    /// Print the shipping tiers for a destination
    Shipping {
        /// ISO country code
        #[arg(short, long, default_value = "FR")]
        country: String,

        /// Cart subtotal in euros, to print a quote
        #[arg(short, long)]
        subtotal: Option<Decimal>,
    },
}

#[tokio::main]
async fn main() {
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
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Shipping { country, subtotal } => {
            commands::shipping::print(&country, subtotal)?;
        }
    }
    Ok(())
}
