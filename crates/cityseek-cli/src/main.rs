//! CitySeek CLI - City catalog ingestion and prefix search
//!
//! A command-line interface for downloading the city dataset, searching it
//! by name or country prefix, and managing favorite cities.
//!
//! # Usage
//!
//! ```bash
//! # Download and ingest the dataset
//! cityseek ingest
//!
//! # Prefix search
//! cityseek search men
//!
//! # Mark a city as favorite
//! cityseek favorite 3844421
//!
//! # Show one city
//! cityseek show 3844421
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;
mod progress;

/// CitySeek - city catalog ingestion and prefix search
#[derive(Parser, Debug)]
#[command(name = "cityseek")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Args, Debug, Clone)]
struct GlobalOptions {
    /// Data directory for the catalog database, dataset cache, and favorites
    #[arg(long, short = 'd', global = true, env = "CITYSEEK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Dataset download URL
    #[arg(long, global = true, env = "CITYSEEK_DATASET_URL")]
    dataset_url: Option<String>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

impl GlobalOptions {
    /// Convert global options to config overrides
    pub fn to_config_overrides(&self) -> cityseek_config::ConfigOverrides {
        cityseek_config::ConfigOverrides {
            data_dir: self.data_dir.clone(),
            dataset_url: self.dataset_url.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download the dataset and populate the local catalog
    Ingest(commands::ingest::IngestArgs),

    /// Search cities by name or country prefix
    Search(commands::search::SearchArgs),

    /// Toggle a city's favorite flag
    Favorite(commands::favorite::FavoriteArgs),

    /// Show a single city by id
    Show(commands::show::ShowArgs),

    /// Show catalog and configuration status
    Status(commands::status::StatusArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = if cli.global.quiet {
        Level::ERROR
    } else if cli.global.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Ingest(args) => commands::ingest::execute(args, cli.global).await,
        Commands::Search(args) => commands::search::execute(args, cli.global).await,
        Commands::Favorite(args) => commands::favorite::execute(args, cli.global).await,
        Commands::Show(args) => commands::show::execute(args, cli.global).await,
        Commands::Status(args) => commands::status::execute(args, cli.global).await,
    }
}
