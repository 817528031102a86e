//! Conversation orchestration
//!
//! One Orchestrator instance owns the session memory and every injected
//! capability (completion client, retriever, composer, preference and plan
//! stores). Each user turn flows through a fixed decision procedure:
//!
//! 1. plan-add trigger phrase short-circuits into a plan add
//! 2. classify the query
//! 3. a cuisine preference statement is persisted and acknowledged
//! 4. generic food questions get the stored cuisine appended to the
//!    retrieval query
//! 5. retrieval below the relevance threshold ends the turn with a fixed
//!    no-match message, leaving session memory untouched
//! 6. otherwise compose the recommendation prompt and record the turn
//!
//! Transport failures never leak to the user; `respond` maps them to a
//! fixed service-unavailable message.

use std::sync::Arc;

use eyre::Result;
use tracing::{debug, error};

use crate::classifier::{Classifier, PreferenceKind};
use crate::config::{RetrievalConfig, TriggersConfig};
use crate::llm::{CompletionRequest, LlmClient};
use crate::plan::PlanStore;
use crate::planner::PlanManager;
use crate::preferences::{PreferenceStore, Preferences};
use crate::prompts::{Composer, FollowUpInputs, RecommendInputs};
use crate::retrieval::Retriever;
use crate::session::SessionState;

const GUIDE_SYSTEM: &str = "You are a knowledgeable and friendly city tour guide.";

const RECOMMEND_MAX_TOKENS: u32 = 1024;

/// Separator between retrieved passages in the composed context
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Shown when retrieval finds nothing relevant enough
pub const MSG_NO_MATCH: &str =
    "I couldn't find any matching venues for that request. Could you try rephrasing or being more specific?";

/// Shown when a follow-up arrives with no previous recommendation
pub const MSG_NO_PRIOR: &str =
    "I don't have any previous recommendations to reference. Please ask about a specific place first.";

/// Shown when retrieval or completion fails at the transport level
pub const MSG_SERVICE_UNAVAILABLE: &str =
    "Sorry, I'm having trouble reaching the recommendation service right now. Please try again in a moment.";

/// Turn-by-turn conversation engine
pub struct Orchestrator {
    llm: Arc<dyn LlmClient>,
    retriever: Arc<dyn Retriever>,
    composer: Arc<Composer>,
    classifier: Classifier,
    preferences: PreferenceStore,
    planner: PlanManager,
    session: SessionState,
    top_k: usize,
    score_threshold: f32,
    triggers: Vec<String>,
}

impl Orchestrator {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        retriever: Arc<dyn Retriever>,
        composer: Arc<Composer>,
        preferences: PreferenceStore,
        plan_store: PlanStore,
        retrieval: &RetrievalConfig,
        triggers: &TriggersConfig,
    ) -> Self {
        let classifier = Classifier::new(llm.clone(), composer.clone());
        let planner = PlanManager::new(plan_store, llm.clone(), composer.clone());
        Self {
            llm,
            retriever,
            composer,
            classifier,
            preferences,
            planner,
            session: SessionState::new(),
            top_k: retrieval.top_k,
            score_threshold: retrieval.score_threshold,
            triggers: triggers.plan_add.clone(),
        }
    }

    /// Answer one user turn, degrading internal failures to a fixed message
    pub async fn respond(&mut self, input: &str) -> String {
        debug!(%input, "respond: called");
        match self.route(input).await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "Turn failed");
                MSG_SERVICE_UNAVAILABLE.to_string()
            }
        }
    }

    async fn route(&mut self, input: &str) -> Result<String> {
        if self.is_follow_up(input).await? {
            self.follow_up(input).await
        } else {
            self.recommend(input).await
        }
    }

    /// Whether any configured plan-add phrase appears in the input
    fn is_trigger(&self, input: &str) -> bool {
        let input = input.to_lowercase();
        self.triggers.iter().any(|phrase| input.contains(phrase.as_str()))
    }

    /// Whether this turn should be handled as a follow-up
    ///
    /// Trigger phrases always route here so the add short-circuit fires
    /// before any recommendation work.
    pub async fn is_follow_up(&self, input: &str) -> Result<bool> {
        if self.is_trigger(input) {
            return Ok(true);
        }
        let classification = self.classifier.classify(input).await?;
        Ok(classification.is_follow_up_category() && self.session.has_recommendation())
    }

    /// Add the last recommended venue to the plan
    pub async fn add_to_plan(&mut self) -> String {
        let context = self.session.last_context.clone();
        self.planner.add_from_context(context.as_deref()).await
    }

    /// Summarize the saved plan
    pub async fn plan_summary(&self) -> String {
        self.planner.summary().await
    }

    /// Generate a day itinerary from the saved plan
    pub async fn day_plan(&self) -> String {
        self.planner.day_plan().await
    }

    pub fn plan_is_empty(&self) -> bool {
        self.planner.is_empty()
    }

    pub fn preferences(&self) -> &Preferences {
        self.preferences.get()
    }

    /// Full recommendation turn
    pub async fn recommend(&mut self, query: &str) -> Result<String> {
        debug!(%query, "recommend: called");

        if self.is_trigger(query) {
            return Ok(self.add_to_plan().await);
        }

        let classification = self.classifier.classify(query).await?;

        if classification.is_preference && classification.preference_type == PreferenceKind::Cuisine {
            if let Some(value) = classification.preference_value.as_deref() {
                self.preferences.update(PreferenceKind::Cuisine, value)?;
                return Ok(format!(
                    "I've noted that you like {} food. I'll remember this for future recommendations!",
                    value
                ));
            }
        }

        // Preferences flow into the turn only for generic food questions
        let preference_gate =
            classification.is_food_category() && classification.is_generic_food_question == Some(true);

        let search_query = match self.preferences.cuisine() {
            Some(cuisine) if preference_gate => {
                debug!(%cuisine, "recommend: augmenting query with stored preference");
                format!("{} {} restaurant", query, cuisine)
            }
            _ => query.to_string(),
        };

        let results = self.retriever.search(&search_query, self.top_k).await?;
        if results.is_empty() || results[0].score < self.score_threshold {
            debug!(
                result_count = results.len(),
                top_score = results.first().map(|r| r.score),
                "recommend: no usable match"
            );
            return Ok(MSG_NO_MATCH.to_string());
        }

        let context = results
            .iter()
            .map(|passage| passage.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);

        let preferences_payload = if preference_gate {
            serde_json::to_string(self.preferences.get())?
        } else {
            serde_json::to_string(&Preferences::default())?
        };

        let prompt = self.composer.recommend(&RecommendInputs {
            category: &classification.category,
            intent: &classification.intent,
            key_terms: &classification.key_terms,
            preferences: &preferences_payload,
            context: &context,
            question: query,
        })?;

        let response = self
            .llm
            .complete(CompletionRequest {
                system_prompt: GUIDE_SYSTEM.to_string(),
                user_prompt: prompt,
                max_tokens: RECOMMEND_MAX_TOKENS,
            })
            .await?
            .into_text()?;

        // Session memory turns over only once the whole turn succeeded
        self.session.record(response.clone(), context, classification);
        Ok(response)
    }

    /// Answer a follow-up about the previous recommendation
    ///
    /// Reads session memory but never overwrites it, so chained follow-ups
    /// keep referring to the same venue.
    pub async fn follow_up(&mut self, question: &str) -> Result<String> {
        debug!(%question, "follow_up: called");

        if self.is_trigger(question) {
            return Ok(self.add_to_plan().await);
        }

        let (Some(context), Some(previous_response)) =
            (self.session.last_context.as_deref(), self.session.last_response.as_deref())
        else {
            return Ok(MSG_NO_PRIOR.to_string());
        };

        let classification = self.classifier.classify(question).await?;
        let preferences_payload = serde_json::to_string(self.preferences.get())?;

        let prompt = self.composer.follow_up(&FollowUpInputs {
            category: &classification.category,
            intent: &classification.intent,
            context,
            previous_response,
            preferences: &preferences_payload,
            question,
        })?;

        let response = self
            .llm
            .complete(CompletionRequest {
                system_prompt: GUIDE_SYSTEM.to_string(),
                user_prompt: prompt,
                max_tokens: RECOMMEND_MAX_TOKENS,
            })
            .await?
            .into_text()?;

        Ok(response)
    }
}
