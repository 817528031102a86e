//! CityGuide - conversational venue recommendation assistant
//!
//! CityGuide answers questions about city venues by combining a local
//! similarity-searched knowledge base with a completion service. Across a
//! session it learns cuisine preferences, remembers the last
//! recommendation for follow-ups, and maintains a durable plan of saved
//! venues.
//!
//! # Modules
//!
//! - [`orchestrator`] - per-turn decision procedure and session memory
//! - [`classifier`] - query classification into the fixed taxonomy
//! - [`preferences`] - durable learned preferences
//! - [`plan`] / [`planner`] - durable plan store and plan workflows
//! - [`retrieval`] - retriever seam over the venue knowledge base
//! - [`prompts`] - embedded templates and the prompt composer
//! - [`llm`] - completion client trait and OpenAI implementation

pub mod classifier;
pub mod cli;
pub mod config;
pub mod llm;
pub mod orchestrator;
pub mod plan;
pub mod planner;
pub mod preferences;
pub mod prompts;
pub mod repl;
pub mod retrieval;
pub mod session;

pub use classifier::{Classification, Classifier, PreferenceKind};
pub use config::Config;
pub use orchestrator::Orchestrator;
pub use plan::{Plan, PlanEntry, PlanStore};
pub use planner::PlanManager;
pub use preferences::{PreferenceStore, Preferences};
pub use session::SessionState;
