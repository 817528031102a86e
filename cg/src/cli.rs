//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CityGuide - conversational venue recommendation assistant
#[derive(Parser)]
#[command(
    name = "cg",
    about = "Conversational city venue recommendation assistant",
    version,
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute; no subcommand starts the interactive chat
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ask a single question and print the answer
    Ask {
        /// The question to ask
        #[arg(value_name = "QUESTION", trailing_var_arg = true, required = true)]
        question: Vec<String>,
    },

    /// Inspect or organize the saved plan
    Plan {
        #[command(subcommand)]
        command: PlanCommand,
    },

    /// Show stored preferences
    Prefs,
}

/// Plan subcommands
#[derive(Debug, Subcommand)]
pub enum PlanCommand {
    /// Summarize the saved venues
    Show,

    /// Generate a day itinerary from the saved venues
    Day,
}
