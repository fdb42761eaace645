//! storerate - role-based access control service for store ratings

#![allow(missing_docs)]

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use storerate::config::{Config, DEFAULT_CONFIG_PATH};
use storerate::storage::Database;
use storerate::utils::logging::init_tracing;
use storerate::{Result, StoreRate};
use tracing::info;

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "storerate", version, about)]
struct Args {
    /// Configuration file; falls back to environment variables when missing
    #[arg(short, long, env = "STORERATE_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Apply pending database migrations and exit
    #[arg(long)]
    migrate: bool,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = Config::load(&args.config).await?;
    init_tracing(config.logging())?;

    if args.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    if args.migrate {
        let db = Database::new(&config.storage().database).await?;
        db.migrate().await?;
        info!("Migrations applied");
        return Ok(());
    }

    StoreRate::new(config).await?.run().await
}
