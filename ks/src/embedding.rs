//! Embedding service client
//!
//! Defines the `Embedder` trait and an OpenAI embeddings API implementation
//! with bounded timeouts and retry/backoff for transient failures.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::EmbeddingConfig;

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

/// Errors that can occur while embedding text
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("API key not found in environment variable {0}")]
    MissingApiKey(String),
}

/// Text embedding capability
///
/// Each call is independent; implementations must be safe to share across
/// tasks. The store embeds chunks at ingest time and the query at search
/// time through the same trait.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text into a vector
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embed a batch of texts, preserving input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}

/// OpenAI embeddings API client
pub struct OpenAIEmbedder {
    model: String,
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

impl OpenAIEmbedder {
    /// Create a new embedder from configuration
    ///
    /// Reads the API key from the environment variable named in the config.
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        debug!(model = %config.model, "from_config: called");
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| EmbeddingError::MissingApiKey(config.api_key_env.clone()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(EmbeddingError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.clone(),
            http,
        })
    }

    async fn request_embeddings(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        debug!(input_count = inputs.len(), model = %self.model, "request_embeddings: called");
        let url = format!("{}/v1/embeddings", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "input": inputs,
        });

        let mut last_error = None;
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(
                    attempt,
                    backoff_ms = backoff,
                    "request_embeddings: retrying after transient error"
                );
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let response = match self
                .http
                .post(url.clone())
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("content-type", "application/json")
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    debug!(attempt, error = %e, "request_embeddings: network error");
                    last_error = Some(EmbeddingError::Network(e));
                    continue;
                }
            };

            let status = response.status().as_u16();

            if is_retryable_status(status) && attempt < MAX_RETRIES {
                let text = response.text().await.unwrap_or_default();
                debug!(attempt, status, "request_embeddings: retryable error");
                last_error = Some(EmbeddingError::ApiError { status, message: text });
                continue;
            }

            if !response.status().is_success() {
                debug!(status, "request_embeddings: API error");
                let text = response.text().await.unwrap_or_default();
                return Err(EmbeddingError::ApiError { status, message: text });
            }

            let api_response: EmbeddingsResponse = response
                .json()
                .await
                .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

            let mut data = api_response.data;
            if data.len() != inputs.len() {
                return Err(EmbeddingError::InvalidResponse(format!(
                    "Expected {} embeddings, got {}",
                    inputs.len(),
                    data.len()
                )));
            }
            data.sort_by_key(|d| d.index);
            debug!("request_embeddings: success");
            return Ok(data.into_iter().map(|d| d.embedding).collect());
        }

        Err(last_error.unwrap_or_else(|| EmbeddingError::InvalidResponse("Max retries exceeded".to_string())))
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.request_embeddings(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| EmbeddingError::InvalidResponse("Empty embedding response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request_embeddings(texts).await
    }
}

/// Cosine similarity between two vectors
///
/// Returns 0.0 when either vector has zero magnitude or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot / (mag_a * mag_b)
}

// OpenAI embeddings API response types

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}
