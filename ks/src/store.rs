//! Core VenueStore implementation

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::embedding::{Embedder, cosine_similarity};

/// One embedded chunk of source text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Sequential chunk ID ("0001", "0002", ...)
    pub chunk_id: String,
    /// Source file path
    pub source: String,
    /// The chunk text
    pub text: String,
    /// Embedding vector for the chunk text
    pub embedding: Vec<f32>,
    /// Creation timestamp (unix ms)
    pub created_at: i64,
}

/// Options for ingesting content
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Size of each chunk in characters
    pub chunk_size: usize,
    /// Overlap between adjacent chunks in characters
    pub overlap: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            chunk_size: crate::DEFAULT_CHUNK_SIZE,
            overlap: crate::DEFAULT_OVERLAP,
        }
    }
}

/// A passage returned from similarity search
#[derive(Debug, Clone)]
pub struct ScoredPassage {
    /// The chunk text
    pub text: String,
    /// Cosine similarity against the query, descending order in results
    pub score: f32,
}

/// Statistics for the store
#[derive(Debug, Clone)]
pub struct StoreStats {
    /// Number of chunks
    pub chunk_count: usize,
    /// Number of source files
    pub source_count: usize,
    /// Total characters stored
    pub total_chars: usize,
}

/// The venue knowledge base
pub struct VenueStore {
    /// Base path for storage
    base_path: PathBuf,
    /// Embedding service used at ingest and query time
    embedder: Arc<dyn Embedder>,
}

/// Split text into character chunks with overlap
///
/// Chunk boundaries respect char boundaries, never byte offsets, so
/// multi-byte content cannot split a code point.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() || chunk_size == 0 {
        return Vec::new();
    }

    // Overlap must leave forward progress
    let step = chunk_size.saturating_sub(overlap).max(1);

    let mut chunks = Vec::new();
    let mut start = 0usize;
    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        let chunk: String = chars[start..end].iter().collect();
        let trimmed = chunk.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }
        if end >= chars.len() {
            break;
        }
        start += step;
    }
    chunks
}

impl VenueStore {
    /// Open or create a venue store at the given path
    pub fn open(path: impl AsRef<Path>, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).context("Failed to create store directory")?;
        debug!(?base_path, "Opened venue store");
        Ok(Self { base_path, embedder })
    }

    fn index_path(&self) -> PathBuf {
        self.base_path.join("index.jsonl")
    }

    /// Ingest the given files, replacing any existing index
    ///
    /// Each file is chunked, the chunks are embedded in one batch per file,
    /// and the whole index is rewritten. Returns the number of chunks.
    pub async fn ingest(&self, paths: &[PathBuf], options: IngestOptions) -> Result<usize> {
        debug!(file_count = paths.len(), ?options, "ingest: called");
        let mut records: Vec<ChunkRecord> = Vec::new();
        let mut chunk_num = 0u32;

        for path in paths {
            let content =
                fs::read_to_string(path).context(format!("Failed to read file: {}", path.display()))?;
            let source = path.to_string_lossy().to_string();

            let chunks = chunk_text(&content, options.chunk_size, options.overlap);
            if chunks.is_empty() {
                debug!(%source, "ingest: file produced no chunks");
                continue;
            }

            let embeddings = self
                .embedder
                .embed_batch(&chunks)
                .await
                .context(format!("Failed to embed chunks from {}", source))?;

            for (text, embedding) in chunks.into_iter().zip(embeddings) {
                chunk_num += 1;
                records.push(ChunkRecord {
                    chunk_id: format!("{:04}", chunk_num),
                    source: source.clone(),
                    text,
                    embedding,
                    created_at: chrono::Utc::now().timestamp_millis(),
                });
            }
        }

        let mut index_file = fs::File::create(self.index_path()).context("Failed to create index file")?;
        for record in &records {
            let line = serde_json::to_string(record)?;
            writeln!(index_file, "{}", line)?;
        }

        info!(chunk_count = records.len(), "Ingestion complete");
        Ok(records.len())
    }

    fn load_index(&self) -> Result<Vec<ChunkRecord>> {
        let index_path = self.index_path();
        if !index_path.exists() {
            return Err(eyre::eyre!(
                "No knowledge base found at {}. Run `ks ingest <files>` first.",
                self.base_path.display()
            ));
        }

        let file = fs::File::open(&index_path).context("Failed to open index file")?;
        let reader = BufReader::new(file);

        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: ChunkRecord = serde_json::from_str(&line).context("Corrupt index entry")?;
            records.push(record);
        }
        Ok(records)
    }

    /// Similarity search over the ingested chunks
    ///
    /// Returns up to `k` passages ordered by descending cosine similarity.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredPassage>> {
        debug!(%query, k, "search: called");
        let records = self.load_index()?;
        if records.is_empty() {
            debug!("search: index is empty");
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await.context("Failed to embed query")?;

        let mut scored: Vec<ScoredPassage> = records
            .into_iter()
            .map(|record| ScoredPassage {
                score: cosine_similarity(&query_embedding, &record.embedding),
                text: record.text,
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        debug!(result_count = scored.len(), "search: returning results");
        Ok(scored)
    }

    /// Get statistics for the store
    pub fn stats(&self) -> Result<StoreStats> {
        let records = self.load_index()?;
        let mut sources = std::collections::HashSet::new();
        let mut total_chars = 0usize;
        for record in &records {
            sources.insert(record.source.clone());
            total_chars += record.text.chars().count();
        }
        Ok(StoreStats {
            chunk_count: records.len(),
            source_count: sources.len(),
            total_chars,
        })
    }

    /// Delete the index
    pub fn clear(&self) -> Result<()> {
        let index_path = self.index_path();
        if index_path.exists() {
            fs::remove_file(&index_path)?;
            info!("Cleared venue store index");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::mock::MockEmbedder;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn test_store(temp: &TempDir) -> VenueStore {
        VenueStore::open(temp.path().join("store"), Arc::new(MockEmbedder::new())).unwrap()
    }

    #[test]
    fn test_chunk_text_respects_size_and_overlap() {
        let text = "a".repeat(1200);
        let chunks = chunk_text(&text, 500, 50);
        assert!(chunks.len() >= 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 500));
    }

    #[test]
    fn test_chunk_text_empty_input() {
        assert!(chunk_text("", 500, 50).is_empty());
        assert!(chunk_text("   \n  ", 500, 50).is_empty());
    }

    #[test]
    fn test_chunk_text_multibyte_safe() {
        let text = "🗽".repeat(600);
        let chunks = chunk_text(&text, 500, 50);
        assert!(!chunks.is_empty());
    }

    #[test]
    fn test_chunk_text_overlap_larger_than_size_still_progresses() {
        let text = "x".repeat(100);
        let chunks = chunk_text(&text, 10, 50);
        assert!(!chunks.is_empty());
        assert!(chunks.len() <= 100);
    }

    proptest! {
        #[test]
        fn chunk_text_laws_hold_for_arbitrary_input(
            text in "\\PC{0,400}",
            chunk_size in 1usize..64,
            overlap in 0usize..64,
        ) {
            let chunks = chunk_text(&text, chunk_size, overlap);

            for chunk in &chunks {
                prop_assert!(chunk.chars().count() <= chunk_size);
                prop_assert!(!chunk.trim().is_empty());
                // Each chunk is a trimmed contiguous slice of the input
                prop_assert!(text.contains(chunk.as_str()));
            }

            // Non-whitespace input always produces output
            if !text.trim().is_empty() {
                prop_assert!(!chunks.is_empty());
            }

            // Step is at least one char, so chunk count is bounded
            prop_assert!(chunks.len() <= text.chars().count());
        }
    }

    #[tokio::test]
    async fn test_ingest_and_search_ranks_related_text_first() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        let data = temp.path().join("venues.txt");
        fs::write(
            &data,
            "Los Tacos No.1 is a mexican restaurant in Chelsea Market with great al pastor.\n\n\
             The Metropolitan Museum of Art is a world class art museum on Fifth Avenue.",
        )
        .unwrap();

        let count = store.ingest(&[data], IngestOptions::default()).await.unwrap();
        assert!(count >= 1);

        let results = store.search("mexican restaurant", 4).await.unwrap();
        assert!(!results.is_empty());
        assert!(results[0].text.to_lowercase().contains("mexican"));
        // Descending order
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn test_search_without_ingest_is_an_error() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        let err = store.search("anything", 4).await.unwrap_err();
        assert!(err.to_string().contains("ks ingest"));
    }

    #[tokio::test]
    async fn test_search_respects_k() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        let data = temp.path().join("venues.txt");
        fs::write(&data, "venue one details here. ".repeat(200)).unwrap();
        store
            .ingest(&[data], IngestOptions { chunk_size: 100, overlap: 10 })
            .await
            .unwrap();

        let results = store.search("venue", 2).await.unwrap();
        assert!(results.len() <= 2);
    }

    #[tokio::test]
    async fn test_stats_and_clear() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        let data = temp.path().join("venues.txt");
        fs::write(&data, "some venue text for statistics").unwrap();
        store.ingest(&[data], IngestOptions::default()).await.unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.chunk_count, 1);
        assert_eq!(stats.source_count, 1);
        assert!(stats.total_chars > 0);

        store.clear().unwrap();
        assert!(store.stats().is_err());
    }
}
