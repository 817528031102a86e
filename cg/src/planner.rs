//! Plan management operations
//!
//! Sits on top of the plan store and owns the three plan workflows: adding
//! the most recent recommendation, summarizing the plan, and generating a
//! day itinerary. Every method returns user-facing text; internal failures
//! are logged and degrade to a fixed message rather than surfacing errors
//! to the conversation loop.

use std::sync::Arc;

use tracing::{debug, error};

use crate::llm::{CompletionRequest, LlmClient};
use crate::plan::{PlanEntry, PlanStore, parse_venue_info};
use crate::prompts::{Composer, DayPlanInputs, ExtractInputs, SummaryInputs};

const PLANNER_SYSTEM: &str = "You are a helpful city travel planner.";

const EXTRACT_MAX_TOKENS: u32 = 200;
const SUMMARY_MAX_TOKENS: u32 = 700;
const DAY_PLAN_MAX_TOKENS: u32 = 1200;

/// Shown when an add is requested with no recommendation on record
pub const MSG_NO_VENUE: &str = "No venue to add to plan. Please ask about a place first.";

/// Shown when a plan summary is requested on an empty plan
pub const MSG_PLAN_EMPTY: &str = "Your plan is empty! Ask me about places you'd like to visit.";

/// Shown when a day plan is requested on an empty plan
pub const MSG_NO_VENUES: &str = "No venues saved in your plan!";

pub const MSG_ADD_FAILED: &str =
    "Sorry, I couldn't add this place to your plan. Please try asking about the venue again.";

pub const MSG_DAY_PLAN_FAILED: &str = "Sorry, I couldn't generate a day plan with your saved venues.";

/// Heading prepended to every generated itinerary
pub const DAY_PLAN_BANNER: &str = "Here's a suggested day plan with your saved places:";

/// Plan workflows backed by the completion service
pub struct PlanManager {
    store: PlanStore,
    llm: Arc<dyn LlmClient>,
    composer: Arc<Composer>,
}

impl PlanManager {
    pub fn new(store: PlanStore, llm: Arc<dyn LlmClient>, composer: Arc<Composer>) -> Self {
        Self { store, llm, composer }
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn store(&self) -> &PlanStore {
        &self.store
    }

    /// Add the venue described by the last recommendation's context
    ///
    /// Extraction runs over the raw retrieved text, not the composed
    /// response. Duplicate names (case-insensitive) are rejected with a
    /// notice instead of a second entry.
    pub async fn add_from_context(&mut self, last_context: Option<&str>) -> String {
        debug!(has_context = last_context.is_some(), "add_from_context: called");

        let Some(context) = last_context else {
            return MSG_NO_VENUE.to_string();
        };

        let info = match self.extract(context).await {
            Ok(info) => info,
            Err(e) => {
                error!(error = %e, "Failed to extract venue info");
                return MSG_ADD_FAILED.to_string();
            }
        };

        if self.store.contains_name(&info.name) {
            debug!(name = %info.name, "add_from_context: duplicate");
            let name = if info.name.is_empty() { "This venue" } else { &info.name };
            return format!("{} is already in your plan!", name);
        }

        let name = if info.name.is_empty() {
            "the venue".to_string()
        } else {
            info.name.clone()
        };

        if let Err(e) = self.store.push(PlanEntry::from_info(info, context)) {
            error!(error = %e, "Failed to persist plan");
            return MSG_ADD_FAILED.to_string();
        }

        format!("Added {} to your plan!", name)
    }

    /// Summarize the saved plan in a short paragraph
    pub async fn summary(&self) -> String {
        debug!(venue_count = self.store.len(), "summary: called");

        if self.store.is_empty() {
            return MSG_PLAN_EMPTY.to_string();
        }

        let result = async {
            let venues = serde_json::to_string_pretty(&self.store.project())?;
            self.generate("summary", &venues, SUMMARY_MAX_TOKENS).await
        }
        .await;

        match result {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "Failed to generate plan summary");
                format!(
                    "Sorry, I couldn't generate your plan summary. You have {} venues saved.",
                    self.store.len()
                )
            }
        }
    }

    /// Generate a single-day itinerary from the saved plan
    pub async fn day_plan(&self) -> String {
        debug!(venue_count = self.store.len(), "day_plan: called");

        if self.store.is_empty() {
            return MSG_NO_VENUES.to_string();
        }

        let venues = match serde_json::to_string_pretty(&self.store.project()) {
            Ok(venues) => venues,
            Err(e) => {
                error!(error = %e, "Failed to encode plan venues");
                return MSG_DAY_PLAN_FAILED.to_string();
            }
        };

        match self.generate("day-plan", &venues, DAY_PLAN_MAX_TOKENS).await {
            Ok(text) => format!("{}\n\n{}", DAY_PLAN_BANNER, text),
            Err(e) => {
                error!(error = %e, "Failed to generate day plan");
                MSG_DAY_PLAN_FAILED.to_string()
            }
        }
    }

    async fn extract(&self, context: &str) -> eyre::Result<crate::plan::VenueInfo> {
        let prompt = self.composer.extract(&ExtractInputs { context })?;
        let response = self
            .llm
            .complete(CompletionRequest {
                system_prompt: PLANNER_SYSTEM.to_string(),
                user_prompt: prompt,
                max_tokens: EXTRACT_MAX_TOKENS,
            })
            .await?;
        Ok(parse_venue_info(response.content.as_deref().unwrap_or("")))
    }

    async fn generate(&self, template: &str, venues: &str, max_tokens: u32) -> eyre::Result<String> {
        let prompt = match template {
            "summary" => self.composer.summary(&SummaryInputs { venues })?,
            _ => self.composer.day_plan(&DayPlanInputs { venues })?,
        };
        let response = self
            .llm
            .complete(CompletionRequest {
                system_prompt: PLANNER_SYSTEM.to_string(),
                user_prompt: prompt,
                max_tokens,
            })
            .await?;
        Ok(response.into_text()?)
    }
}
