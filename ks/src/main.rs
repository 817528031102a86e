use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use venuestore::cli::{Cli, Command};
use venuestore::config::Config;
use venuestore::{IngestOptions, OpenAIEmbedder, VenueStore};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn open_store(config: &Config) -> Result<VenueStore> {
    let embedder = OpenAIEmbedder::from_config(&config.embedding).context("Failed to create embedder")?;
    VenueStore::open(&config.store_path, Arc::new(embedder))
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("venuestore starting");

    match cli.command {
        Command::Ingest {
            paths,
            chunk_size,
            overlap,
        } => {
            let store = open_store(&config)?;
            let count = store
                .ingest(
                    &paths,
                    IngestOptions {
                        chunk_size: chunk_size.unwrap_or(config.chunk_size),
                        overlap: overlap.unwrap_or(config.overlap),
                    },
                )
                .await?;
            println!("{} Ingested {} chunks", "✓".green(), count.to_string().cyan());
        }
        Command::Search { query, top_k } => {
            let store = open_store(&config)?;
            let results = store.search(&query, top_k).await?;
            if results.is_empty() {
                println!("No matches");
            } else {
                for passage in results {
                    println!("{} {}", format!("{:.3}", passage.score).yellow(), passage.text);
                }
            }
        }
        Command::Stats => {
            let store = open_store(&config)?;
            let stats = store.stats()?;
            println!("Knowledge base");
            println!("  Chunks: {}", stats.chunk_count);
            println!("  Sources: {}", stats.source_count);
            println!("  Total chars: {}", stats.total_chars);
        }
        Command::Clear => {
            let store = open_store(&config)?;
            store.clear()?;
            println!("{} Cleared knowledge base", "✓".green());
        }
    }

    Ok(())
}
