//! Command-line and environment configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use agent_core::{AgentConfig, GenerationOptions};
use agent_runtime::OllamaConfig;

#[derive(Debug, Parser)]
#[command(name = "analyst", version, about = "Ask questions about CSV files and documents")]
pub struct Cli {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Model runtime settings, read from the environment unless given as flags
#[derive(Debug, Args)]
pub struct ModelArgs {
    /// Ollama host URL
    #[arg(long, global = true, env = "OLLAMA_HOST", default_value = "http://localhost")]
    pub ollama_host: String,

    /// Ollama port
    #[arg(long, global = true, env = "OLLAMA_PORT", default_value_t = 11434)]
    pub ollama_port: u16,

    /// Model used for every completion
    #[arg(long, global = true, env = "ANALYST_MODEL", default_value = "llama3.2")]
    pub model: String,

    /// Sampling temperature
    #[arg(long, global = true, env = "ANALYST_TEMPERATURE", default_value_t = 0.0)]
    pub temperature: f32,

    /// Reasoning steps before the agent gives up
    #[arg(long, global = true, env = "ANALYST_MAX_ITERATIONS", default_value_t = 10)]
    pub max_iterations: usize,
}

impl ModelArgs {
    pub fn ollama(&self) -> OllamaConfig {
        OllamaConfig {
            host: self.ollama_host.clone(),
            port: self.ollama_port,
        }
    }

    /// Options for a single, plain completion
    pub fn generation(&self) -> GenerationOptions {
        GenerationOptions {
            model: self.model.clone(),
            temperature: self.temperature,
            ..GenerationOptions::default()
        }
    }

    /// Reasoning loop settings; keeps the loop's stop sequences
    pub fn agent(&self) -> AgentConfig {
        let defaults = AgentConfig::default();
        AgentConfig {
            max_iterations: self.max_iterations,
            generation: GenerationOptions {
                model: self.model.clone(),
                temperature: self.temperature,
                ..defaults.generation
            },
            ..defaults
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Answer a question about a CSV file with the analyst agent
    Analyze {
        /// CSV file to analyse
        #[arg(long, short)]
        file: PathBuf,

        /// The question
        question: String,
    },

    /// Print the grounded QA prompt for a question
    Prompt {
        /// JSON Lines corpus of fragments
        #[arg(long, short)]
        corpus: PathBuf,

        /// The question
        question: String,
    },

    /// Build the grounded QA prompt and answer it with the model
    Ask {
        /// JSON Lines corpus of fragments
        #[arg(long, short)]
        corpus: PathBuf,

        /// The question
        question: String,
    },

    /// List the dataset tools the analyst agent can call
    Tools,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "analyst",
            "analyze",
            "--file",
            "sales.csv",
            "What is the average price?",
            "--model",
            "mistral",
            "--max-iterations",
            "4",
        ])
        .unwrap();

        assert_eq!(cli.model.model, "mistral");
        assert_eq!(cli.model.max_iterations, 4);
        assert!(matches!(
            cli.command,
            Command::Analyze { ref file, ref question }
                if file == &PathBuf::from("sales.csv") && question == "What is the average price?"
        ));

        let agent = cli.model.agent();
        assert_eq!(agent.generation.model, "mistral");
        assert_eq!(agent.max_iterations, 4);
        assert_eq!(agent.generation.stop_sequences, vec!["\nObservation:"]);
    }

    #[test]
    fn test_parse_prompt() {
        let cli = Cli::try_parse_from(["analyst", "prompt", "-c", "docs.jsonl", "Who?"]).unwrap();
        assert!(matches!(cli.command, Command::Prompt { .. }));
        assert!(cli.model.generation().stop_sequences.is_empty());
    }
}
