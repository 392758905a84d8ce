mod db;
mod geo;
mod search;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::geo::{DistanceArgs, ProviderArgs};
use crate::search::SearchArgs;

#[derive(Debug, Parser)]
#[command(name = "nearby-cli")]
#[command(about = "Nearby business discovery command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Upsert businesses from a JSON snapshot into Postgres
    Import {
        /// Path to a `{"businesses": [...]}` snapshot
        file: PathBuf,
        /// Validate the snapshot without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Run a search and print the response as JSON
    Search(SearchArgs),
    /// Resolve an address to coordinates
    Geocode {
        address: String,
        #[command(flatten)]
        provider: ProviderArgs,
    },
    /// Resolve coordinates to an address
    ReverseGeocode {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[command(flatten)]
        provider: ProviderArgs,
    },
    /// Estimate distance and travel time between two points
    Distance(DistanceArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Migrate) => db::run_migrate().await?,
        Some(Commands::Import { file, dry_run }) => db::run_import(&file, dry_run).await?,
        Some(Commands::Search(args)) => search::run_search(args).await?,
        Some(Commands::Geocode { address, provider }) => {
            geo::run_geocode(&address, &provider).await?;
        }
        Some(Commands::ReverseGeocode { lat, lon, provider }) => {
            geo::run_reverse_geocode(lat, lon, &provider).await?;
        }
        Some(Commands::Distance(args)) => geo::run_distance(&args).await?,
        None => println!("nearby-cli ready; run with --help for commands"),
    }

    Ok(())
}

/// Pretty-prints any serializable value to stdout.
fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
