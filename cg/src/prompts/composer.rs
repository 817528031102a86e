//! Prompt composer
//!
//! Registry of prompt templates keyed by use case. Every render takes an
//! explicit, fully-typed input record; the Orchestrator stays the single
//! place that decides which values a turn supplies.

use eyre::{Context, Result};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;

/// Inputs for the classification prompt
#[derive(Debug, Serialize)]
pub struct ClassifyInputs<'a> {
    pub query: &'a str,
}

/// Inputs for the initial recommendation prompt
#[derive(Debug, Serialize)]
pub struct RecommendInputs<'a> {
    pub category: &'a str,
    pub intent: &'a str,
    pub key_terms: &'a str,
    /// JSON-encoded preferences payload
    pub preferences: &'a str,
    pub context: &'a str,
    pub question: &'a str,
}

/// Inputs for the follow-up prompt
#[derive(Debug, Serialize)]
pub struct FollowUpInputs<'a> {
    pub category: &'a str,
    pub intent: &'a str,
    pub context: &'a str,
    pub previous_response: &'a str,
    /// JSON-encoded preferences payload
    pub preferences: &'a str,
    pub question: &'a str,
}

/// Inputs for the day plan prompt
#[derive(Debug, Serialize)]
pub struct DayPlanInputs<'a> {
    /// JSON-encoded projected venue list
    pub venues: &'a str,
}

/// Inputs for the venue info extraction prompt
#[derive(Debug, Serialize)]
pub struct ExtractInputs<'a> {
    pub context: &'a str,
}

/// Inputs for the plan summary prompt
#[derive(Debug, Serialize)]
pub struct SummaryInputs<'a> {
    /// JSON-encoded projected venue list
    pub venues: &'a str,
}

/// Template registry for all prompt use cases
pub struct Composer {
    handlebars: Handlebars<'static>,
}

impl Composer {
    /// Create a composer with all embedded templates registered
    pub fn new() -> Result<Self> {
        debug!("Composer::new: called");
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);

        handlebars
            .register_template_string("classification", embedded::CLASSIFICATION)
            .context("Failed to register classification template")?;
        handlebars
            .register_template_string("recommend", embedded::RECOMMEND)
            .context("Failed to register recommend template")?;
        handlebars
            .register_template_string("follow-up", embedded::FOLLOW_UP)
            .context("Failed to register follow-up template")?;
        handlebars
            .register_template_string("day-plan", embedded::DAY_PLAN)
            .context("Failed to register day-plan template")?;
        handlebars
            .register_template_string("extract", embedded::EXTRACT)
            .context("Failed to register extract template")?;
        handlebars
            .register_template_string("summary", embedded::SUMMARY)
            .context("Failed to register summary template")?;

        Ok(Self { handlebars })
    }

    /// Render the classification prompt
    pub fn classification(&self, inputs: &ClassifyInputs) -> Result<String> {
        self.render("classification", inputs)
    }

    /// Render the initial recommendation prompt
    pub fn recommend(&self, inputs: &RecommendInputs) -> Result<String> {
        self.render("recommend", inputs)
    }

    /// Render the follow-up prompt
    pub fn follow_up(&self, inputs: &FollowUpInputs) -> Result<String> {
        self.render("follow-up", inputs)
    }

    /// Render the day plan prompt
    pub fn day_plan(&self, inputs: &DayPlanInputs) -> Result<String> {
        self.render("day-plan", inputs)
    }

    /// Render the venue extraction prompt
    pub fn extract(&self, inputs: &ExtractInputs) -> Result<String> {
        self.render("extract", inputs)
    }

    /// Render the plan summary prompt
    pub fn summary(&self, inputs: &SummaryInputs) -> Result<String> {
        self.render("summary", inputs)
    }

    fn render<T: Serialize + std::fmt::Debug>(&self, name: &str, inputs: &T) -> Result<String> {
        debug!(%name, "render: called");
        self.handlebars
            .render(name, inputs)
            .context(format!("Failed to render template '{}'", name))
    }
}
