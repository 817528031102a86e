//! CLI argument parsing for venuestore

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ks")]
#[command(author, version, about = "Venue knowledge base for the CityGuide assistant", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ingest text files into the knowledge base (replaces the index)
    Ingest {
        /// File paths to ingest
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Chunk size in characters (default: 500)
        #[arg(short = 's', long)]
        chunk_size: Option<usize>,

        /// Overlap between chunks in characters (default: 50)
        #[arg(short, long)]
        overlap: Option<usize>,
    },

    /// Run a similarity search against the knowledge base
    Search {
        /// Query text
        #[arg(required = true)]
        query: String,

        /// Maximum results to return
        #[arg(short = 'k', long, default_value = "4")]
        top_k: usize,
    },

    /// Show statistics for the knowledge base
    Stats,

    /// Delete the knowledge base index
    Clear,
}
