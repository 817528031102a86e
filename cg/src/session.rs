//! In-memory session state
//!
//! One record per process holding what follow-ups need from the previous
//! turn. Nothing here is persisted; a restart forgets the conversation.

use crate::classifier::Classification;

/// What the previous successful recommendation turn left behind
///
/// All three fields are set together when a recommendation completes and
/// are never partially updated. Follow-up turns read them but leave them
/// untouched, so chained follow-ups keep referring to the same venue.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// The composed response shown to the user
    pub last_response: Option<String>,
    /// The raw joined retrieval context behind that response
    pub last_context: Option<String>,
    /// The classification of the query that produced it
    pub last_classification: Option<Classification>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a previous recommendation exists to follow up on
    pub fn has_recommendation(&self) -> bool {
        self.last_response.is_some()
    }

    /// Record a completed recommendation turn
    pub fn record(&mut self, response: String, context: String, classification: Classification) {
        self.last_response = Some(response);
        self.last_context = Some(context);
        self.last_classification = Some(classification);
    }
}
