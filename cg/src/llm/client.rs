//! LlmClient trait definition

use async_trait::async_trait;
#[allow(unused_imports)]
use tracing::debug;

use super::LlmError;

/// A single completion request
///
/// Every call is independent: the assistant carries its own session memory
/// and passes whatever context a turn needs inside the prompt.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System prompt establishing the assistant role
    pub system_prompt: String,
    /// The rendered user prompt for this turn
    pub user_prompt: String,
    /// Maximum tokens for the response
    pub max_tokens: u32,
}

/// Token usage accounting from the provider
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// A completion response
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Response text, if any was produced
    pub content: Option<String>,
    /// Token usage for the call
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Extract the response text, treating an empty response as invalid
    pub fn into_text(self) -> Result<String, LlmError> {
        match self.content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(LlmError::InvalidResponse("Empty completion response".to_string())),
        }
    }
}

/// Stateless LLM completion client
///
/// `complete` blocks until the full response is available; there is no
/// streaming variant.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// Mock LLM client for unit tests
    ///
    /// Returns queued responses in order and records every request so tests
    /// can assert on the prompts the orchestrator composed.
    pub struct MockLlmClient {
        responses: Vec<Result<CompletionResponse, String>>,
        call_count: AtomicUsize,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl MockLlmClient {
        pub fn new(responses: Vec<Result<CompletionResponse, String>>) -> Self {
            debug!(response_count = %responses.len(), "MockLlmClient::new: called");
            Self {
                responses,
                call_count: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Queue plain text responses
        pub fn with_texts(texts: Vec<&str>) -> Self {
            Self::new(
                texts
                    .into_iter()
                    .map(|t| {
                        Ok(CompletionResponse {
                            content: Some(t.to_string()),
                            usage: TokenUsage::default(),
                        })
                    })
                    .collect(),
            )
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        pub fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            debug!("MockLlmClient::complete: called");
            self.requests.lock().unwrap().push(request);
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            match self.responses.get(idx) {
                Some(Ok(response)) => Ok(response.clone()),
                Some(Err(message)) => Err(LlmError::InvalidResponse(message.clone())),
                None => Err(LlmError::InvalidResponse("No more mock responses".to_string())),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_client_returns_responses_in_order() {
            let client = MockLlmClient::with_texts(vec!["Response 1", "Response 2"]);

            let req = CompletionRequest {
                system_prompt: "Test".to_string(),
                user_prompt: "Hello".to_string(),
                max_tokens: 100,
            };

            let resp1 = client.complete(req.clone()).await.unwrap();
            assert_eq!(resp1.content, Some("Response 1".to_string()));

            let resp2 = client.complete(req.clone()).await.unwrap();
            assert_eq!(resp2.content, Some("Response 2".to_string()));

            assert_eq!(client.call_count(), 2);
            assert_eq!(client.requests().len(), 2);
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockLlmClient::new(vec![]);

            let req = CompletionRequest {
                system_prompt: "Test".to_string(),
                user_prompt: "Hello".to_string(),
                max_tokens: 100,
            };

            assert!(client.complete(req).await.is_err());
        }
    }
}
