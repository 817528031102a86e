//! VenueStore - embedding-backed venue knowledge base
//!
//! Stores a city's venue descriptions as embedded text chunks and answers
//! similarity queries over them. The assistant crate consumes this through
//! its `Retriever` seam; the `ks` binary manages the knowledge base from
//! the command line.
//!
//! # Architecture
//!
//! ```text
//! venuestore/
//! └── index.jsonl      # one ChunkRecord per line (text + embedding)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use venuestore::{VenueStore, IngestOptions};
//!
//! let store = VenueStore::open(".venuestore", embedder)?;
//! store.ingest(&[PathBuf::from("data/nyc.txt")], IngestOptions::default()).await?;
//! let hits = store.search("mexican restaurant", 4).await?;
//! ```

pub mod cli;
pub mod config;
pub mod embedding;
mod store;

pub use config::{Config, EmbeddingConfig};
pub use embedding::{Embedder, EmbeddingError, OpenAIEmbedder, cosine_similarity};
pub use store::{ChunkRecord, IngestOptions, ScoredPassage, StoreStats, VenueStore, chunk_text};

/// Default chunk size in characters
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Default overlap between adjacent chunks in characters
pub const DEFAULT_OVERLAP: usize = 50;
