mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mindlog::config::MindlogConfig;

#[derive(Parser)]
#[command(
    name = "mindlog",
    version,
    about = "Private journaling service with weekly emotional profiles"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API
    Serve,
    /// Manage the local models
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },
    /// Write a journal entry
    Write {
        /// Entry text
        text: String,
    },
    /// Find entries similar to a query
    Search {
        query: String,
        /// Number of results (default from config)
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Show the most recent entries
    Recent {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the weekly emotional profile
    Weekly {
        /// Trailing window in days (default from config)
        #[arg(long)]
        days: Option<u32>,
        /// Sort the window by timestamp before counting mood switches
        #[arg(long)]
        chronological: bool,
    },
    /// Import entries from a JSON array (e.g. an old memory.json)
    Import { file: PathBuf },
    /// Export all entries as JSON to stdout
    Export,
    /// Check database health
    Doctor,
}

#[derive(Subcommand)]
enum ModelAction {
    /// Download the embedding and sentiment models to ~/.mindlog/models/
    Download,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = MindlogConfig::load()?;

    // Log to stderr so stdout stays clean for JSON output.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => mindlog::server::serve(config).await?,
        Command::Model { action } => match action {
            ModelAction::Download => cli::model_download(&config).await?,
        },
        Command::Write { text } => cli::write::write(&config, &text).await?,
        Command::Search { query, top_k } => cli::search::search(&config, &query, top_k).await?,
        Command::Recent { limit } => cli::recent::recent(&config, limit)?,
        Command::Weekly {
            days,
            chronological,
        } => cli::weekly::weekly(&config, days, chronological)?,
        Command::Import { file } => cli::import::import(&config, &file).await?,
        Command::Export => cli::export::export(&config)?,
        Command::Doctor => cli::doctor::doctor(&config)?,
    }

    Ok(())
}
