//! LLM client module for CityGuide
//!
//! Provides blocking completion requests against the configured provider.
//! Streaming is deliberately not supported; every turn is a single
//! request/response exchange.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod openai;

pub use client::{CompletionRequest, CompletionResponse, LlmClient, TokenUsage};
pub use error::LlmError;
pub use openai::OpenAIClient;

use crate::config::LlmConfig;

/// Create an LLM client from configuration
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(model = %config.model, "create_client: called");
    Ok(Arc::new(OpenAIClient::from_config(config)?))
}
