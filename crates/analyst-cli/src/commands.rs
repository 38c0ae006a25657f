//! Subcommand handlers. Each returns the text printed on stdout.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use agent_core::{LlmProvider, Message};
use agent_runtime::OllamaProvider;
use data_analyst::{dataset_tools, AnalystConfig, DataAnalyst, DatasetSession, LoaderConfig};
use doc_qa::{GroundedPrompt, InMemoryIndex};

use crate::config::ModelArgs;

/// Answer a question about a CSV file with the analyst agent
pub async fn analyze(args: &ModelArgs, file: &Path, question: &str) -> anyhow::Result<String> {
    let config = AnalystConfig {
        agent: args.agent(),
        ..AnalystConfig::default()
    };
    if let Some(placeholder) = placeholder_in_path(file, &config.loader) {
        tracing::warn!(
            file = %file.display(),
            placeholder,
            "Path contains the space placeholder; the literal path is used only if the \
             rewritten one does not exist"
        );
    }

    let provider = connect(args).await;
    let analyst = DataAnalyst::with_config(provider, config);

    let answer = analyst
        .run(&file.to_string_lossy(), question)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    Ok(answer)
}

/// Render the grounded QA prompt without calling a model
pub async fn prompt(corpus: &Path, question: &str) -> anyhow::Result<String> {
    let builder = grounded(corpus)?;
    let prompt = builder.build_prompt(question).await?;
    Ok(prompt)
}

/// Render the grounded QA prompt and send it to the model
pub async fn ask(args: &ModelArgs, corpus: &Path, question: &str) -> anyhow::Result<String> {
    let builder = grounded(corpus)?;
    let prompt = builder.build_prompt(question).await?;
    tracing::debug!(chars = prompt.len(), "Built grounded prompt");

    let provider = connect(args).await;
    let completion = provider
        .complete(&[Message::user(prompt)], &args.generation())
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    Ok(completion.content.trim().to_string())
}

/// Dataset tool listing, as the agent sees it
pub fn tools() -> String {
    let session = Arc::new(DatasetSession::new());
    dataset_tools(&session).generate_prompt_section()
}

/// The loader placeholder, when the file path contains it
fn placeholder_in_path<'a>(file: &Path, loader: &'a LoaderConfig) -> Option<&'a str> {
    loader
        .space_placeholder
        .as_deref()
        .filter(|p| !p.is_empty() && file.to_string_lossy().contains(p))
}

fn grounded(corpus: &Path) -> anyhow::Result<GroundedPrompt> {
    let index = InMemoryIndex::from_jsonl(corpus)
        .with_context(|| format!("reading corpus {}", corpus.display()))?;
    tracing::info!(fragments = index.len(), corpus = %corpus.display(), "Loaded corpus");
    Ok(GroundedPrompt::new(Arc::new(index)))
}

async fn connect(args: &ModelArgs) -> Arc<dyn LlmProvider> {
    let provider = OllamaProvider::from_config(args.ollama());

    match provider.health_check().await {
        Ok(true) => {
            tracing::info!(endpoint = %provider.endpoint(), "Connected to Ollama");
            match provider.list_models().await {
                Ok(models) if models.iter().any(|m| m.matches(&args.model)) => {
                    tracing::info!(model = %args.model, "Model available");
                }
                Ok(models) => {
                    let names: Vec<&str> = models.iter().map(|m| m.name.as_str()).collect();
                    tracing::warn!(model = %args.model, available = ?names, "Model not pulled");
                    tracing::warn!("  Pull it first: ollama pull {}", args.model);
                }
                Err(e) => tracing::warn!(error = %e, "Could not list models"),
            }
        }
        Ok(false) | Err(_) => {
            tracing::warn!(
                endpoint = %provider.endpoint(),
                "Ollama not available - requests will fail"
            );
            tracing::warn!("  Make sure Ollama is running: ollama serve");
        }
    }

    Arc::new(provider)
}
