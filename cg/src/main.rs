//! CityGuide - conversational venue recommendation assistant
//!
//! CLI entry point for the chat session and one-shot commands.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info};

use cityguide::cli::{Cli, Command, PlanCommand};
use cityguide::config::Config;
use cityguide::llm::create_client;
use cityguide::orchestrator::Orchestrator;
use cityguide::plan::PlanStore;
use cityguide::preferences::PreferenceStore;
use cityguide::prompts::Composer;
use cityguide::repl::ChatSession;
use cityguide::retrieval::VenueRetriever;
use venuestore::OpenAIEmbedder;

fn setup_logging(cli_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cityguide")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = match cli_log_level.map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    // Logs go to a file so they never interleave with the chat transcript
    let log_file = fs::File::create(log_dir.join("cityguide.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn build_orchestrator(config: &Config) -> Result<Orchestrator> {
    debug!("build_orchestrator: called");

    let llm = create_client(&config.llm).context("Failed to create completion client")?;
    let embedder = Arc::new(
        OpenAIEmbedder::from_config(&config.retrieval.embedding).context("Failed to create embedding client")?,
    );
    let retriever = Arc::new(
        VenueRetriever::open(&config.retrieval.store_dir, embedder).context("Failed to open venue store")?,
    );
    let composer = Arc::new(Composer::new().context("Failed to initialize prompt composer")?);
    let preferences =
        PreferenceStore::load(config.storage.preferences_path()).context("Failed to load preferences")?;
    let plan = PlanStore::load(config.storage.plan_path()).context("Failed to load plan")?;

    Ok(Orchestrator::new(
        llm,
        retriever,
        composer,
        preferences,
        plan,
        &config.retrieval,
        &config.triggers,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level.as_deref())?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    debug!(?config, "main: config loaded");

    match cli.command {
        None => {
            let orchestrator = build_orchestrator(&config)?;
            let mut session = ChatSession::new(orchestrator);
            session.run().await?;
        }
        Some(Command::Ask { question }) => {
            let mut orchestrator = build_orchestrator(&config)?;
            let question = question.join(" ");
            println!("{}", orchestrator.respond(&question).await);
        }
        Some(Command::Plan { command }) => {
            let orchestrator = build_orchestrator(&config)?;
            match command {
                PlanCommand::Show => println!("{}", orchestrator.plan_summary().await),
                PlanCommand::Day => println!("{}", orchestrator.day_plan().await),
            }
        }
        Some(Command::Prefs) => {
            let preferences =
                PreferenceStore::load(config.storage.preferences_path()).context("Failed to load preferences")?;
            match preferences.cuisine() {
                Some(cuisine) => println!("cuisine: {}", cuisine),
                None => println!("cuisine: (not set)"),
            }
        }
    }

    Ok(())
}
