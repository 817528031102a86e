//! Interactive chat session
//!
//! Line-oriented conversation loop. A handful of exact commands (exit
//! synonyms, `show plan`, `add to plan`) are handled locally; everything
//! else goes through the orchestrator's follow-up and recommendation
//! routing.

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::orchestrator::Orchestrator;

const EXIT_COMMANDS: [&str; 4] = ["quit", "exit", "bye", "done"];

/// Interactive chat session over one orchestrator
pub struct ChatSession {
    orchestrator: Orchestrator,
}

impl ChatSession {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Welcome to CityGuide! Let's explore the city today.".bright_cyan());
        println!("Tell me what you'd like to do or where you'd like to go!");
        println!("You can:");
        println!("- Tell me your preferences (e.g., 'I like Mexican food')");
        println!("- Ask for recommendations");
        println!("- Ask about specific places");
        println!("- Ask follow-up questions");
        println!("- Say 'add to plan' to save a place you like");
        println!();
        println!("Type 'show plan' to see your saved places");
        println!("Type 'exit' to quit");
        println!();
    }

    async fn print_farewell(&self) {
        if !self.orchestrator.plan_is_empty() {
            println!();
            println!("{}", "Here's your final plan:".bright_cyan());
            println!("{}", self.orchestrator.plan_summary().await);
            println!();
            println!("Let me organize these places into a day plan for you...");
            println!("{}", self.orchestrator.day_plan().await);
        }
        println!();
        println!("Thanks for exploring! I'll remember your preferences and plan for next time!");
    }

    /// Run the chat loop until an exit command or EOF
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", "You:".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim().to_lowercase();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(&input);

                    if EXIT_COMMANDS.contains(&input.as_str()) {
                        self.print_farewell().await;
                        break;
                    }

                    if input == "show plan" {
                        println!();
                        println!("{} {}", "Guide:".bright_cyan(), self.orchestrator.plan_summary().await);
                        println!();
                        continue;
                    }

                    let response = if input == "add to plan" {
                        self.orchestrator.add_to_plan().await
                    } else {
                        self.orchestrator.respond(&input).await
                    };

                    println!();
                    println!("{} {}", "Guide:".bright_cyan(), response);
                    println!();
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    debug!("run: EOF, exiting");
                    println!();
                    self.print_farewell().await;
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        Ok(())
    }
}
