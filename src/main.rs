//! Foodfetch main entry point
//!
//! This is the command-line interface for fetching OpenFoodFacts product
//! data into a local SQLite database.

use clap::Parser;
use foodfetch::config::{load_config, Config};
use foodfetch::output::{load_statistics, print_statistics};
use foodfetch::{ingest, CatalogClient, SqliteStorage};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Foodfetch: fetch and store food product data from OpenFoodFacts
///
/// Searches the OpenFoodFacts catalog for the given terms and stores every
/// matching product, with its nutrition, ingredient, category, and country
/// data, in a local SQLite database. Products already in the database are
/// skipped.
#[derive(Parser, Debug)]
#[command(name = "foodfetch")]
#[command(version = "1.0.0")]
#[command(about = "Fetch and store food product data from OpenFoodFacts", long_about = None)]
struct Cli {
    /// Search terms to find products (e.g. "coca cola", "chocolate")
    #[arg(value_name = "SEARCH_TERMS", required_unless_present = "stats")]
    search_terms: Option<String>,

    /// Maximum number of pages to fetch (default: all pages)
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Database path, overriding the configured one
    #[arg(long, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show row counts from the database and exit
    #[arg(long)]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if let Some(database) = &cli.database {
        config.output.database_path = database.display().to_string();
    }

    if cli.stats {
        return handle_stats(&config);
    }

    let terms = cli.search_terms.unwrap_or_default();

    tokio::select! {
        result = handle_ingest(&config, &terms, cli.max_pages) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::error!("Interrupted, uncommitted batch discarded");
            anyhow::bail!("interrupted")
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("foodfetch=info,warn"),
            1 => EnvFilter::new("foodfetch=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the main fetch-and-ingest operation
async fn handle_ingest(
    config: &Config,
    terms: &str,
    max_pages: Option<u32>,
) -> anyhow::Result<()> {
    tracing::info!("Initializing database at: {}", config.output.database_path);
    let mut storage = SqliteStorage::new(Path::new(&config.output.database_path))?;

    tracing::info!("Searching for products with terms: '{}'", terms);
    if let Some(cap) = max_pages {
        tracing::info!("Limited to maximum {} pages", cap);
    }

    let client = CatalogClient::new(config.api.clone())?;
    let mut pager = client.search(terms, max_pages).await;
    let total_count = pager.total_count();

    let report = ingest(&mut pager, total_count, &mut storage).await?;

    storage.close()?;

    tracing::info!(
        "Search complete: {} products saved, {} skipped",
        report.saved,
        report.skipped()
    );

    Ok(())
}

/// Handles the --stats mode: shows row counts from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}
