//! Prompt templates for CityGuide
//!
//! Templates are `.pmt` files embedded at build time and rendered with
//! handlebars against typed input records. The Composer is the only way to
//! build a prompt; no template reads global state.

mod composer;
pub mod embedded;

pub use composer::{
    ClassifyInputs, Composer, DayPlanInputs, ExtractInputs, FollowUpInputs, RecommendInputs, SummaryInputs,
};
