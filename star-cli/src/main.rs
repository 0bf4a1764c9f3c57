//! STAR CLI - maintenance shell for the business store

mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use star_core::{Business, Collection, Config};

#[derive(Parser)]
#[command(name = "star")]
#[command(version)]
#[command(about = "STAR Business - barbershop, billiards and car wash records")]
#[command(long_about = r#"
Maintenance commands for the STAR Business store.

Example usage:
  star export --output backup.json
  star import backup.json
  star summary --date 2024-06-03
  star list products
"#)]
struct Cli {
    /// Path to the database file (defaults to STAR_DATABASE_PATH or the data directory)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a JSON backup of every collection
    Export {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace collections with the contents of a backup
    Import {
        /// Backup file produced by `export`
        file: PathBuf,
    },

    /// Insert the starter catalog if the catalog is empty
    Seed,

    /// Show appointment, sale and vehicle counts for a day
    Summary {
        /// Day to summarize, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Print every record of a collection as JSON
    List {
        /// appointments, products, vehicles, completed_vehicles, sales or users
        collection: Collection,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    star_core::init_logging_with_default(if cli.verbose { "debug" } else { "info" });

    let mut config = Config::from_env();
    if let Some(path) = cli.database {
        config = config.with_database_path(path);
    }
    tracing::debug!(database = %config.database_path.display(), "Using store");

    let business = Business::new(config)?;

    match cli.command {
        Commands::Export { output } => commands::export(&business, output.as_deref()).await,
        Commands::Import { file } => commands::import(&business, &file).await,
        Commands::Seed => commands::seed(&business).await,
        Commands::Summary { date } => {
            commands::summary(&business, date.unwrap_or_else(star_core::today)).await
        }
        Commands::List { collection } => commands::list(&business, collection).await,
    }
}
