//! analyst command-line tool
//!
//! Runs the CSV analyst agent against a local Ollama model, or builds and
//! answers grounded document QA prompts.

mod commands;
mod config;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment before clap reads env-backed flags
    dotenvy::dotenv().ok();

    // Logs go to stderr so answers on stdout stay pipeable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let output = match cli.command {
        Command::Analyze { file, question } => {
            commands::analyze(&cli.model, &file, &question).await?
        }
        Command::Prompt { corpus, question } => commands::prompt(&corpus, &question).await?,
        Command::Ask { corpus, question } => commands::ask(&cli.model, &corpus, &question).await?,
        Command::Tools => commands::tools(),
    };

    println!("{output}");
    Ok(())
}
