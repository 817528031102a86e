//! Retrieval seam
//!
//! The orchestrator talks to retrieval through a trait so the conversation
//! logic can be tested without a knowledge base on disk. The production
//! implementation adapts the venue store's similarity search.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;
use venuestore::{Embedder, ScoredPassage, VenueStore};

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Retrieval failed: {0}")]
    Search(String),
}

/// Scored-passage search over the venue knowledge base
///
/// Implementations return up to `top_k` passages ordered by descending
/// relevance score. An empty result is not an error.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<ScoredPassage>, RetrievalError>;
}

/// Production retriever backed by the venue store
pub struct VenueRetriever {
    store: VenueStore,
}

impl VenueRetriever {
    /// Open the venue store at the given path with the given embedder
    pub fn open(path: impl AsRef<std::path::Path>, embedder: Arc<dyn Embedder>) -> eyre::Result<Self> {
        let store = VenueStore::open(path, embedder)?;
        Ok(Self { store })
    }
}

#[async_trait]
impl Retriever for VenueRetriever {
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<ScoredPassage>, RetrievalError> {
        debug!(%query, top_k, "search: called");
        self.store
            .search(query, top_k)
            .await
            .map_err(|e| RetrievalError::Search(e.to_string()))
    }
}
