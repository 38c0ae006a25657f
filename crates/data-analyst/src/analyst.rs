//! Data Analyst Agent
//!
//! Factory that gives every request its own dataset session, the seven
//! dataset tools bound to it, and the analyst request prompt.

use std::sync::Arc;

use agent_core::{Agent, AgentBuilder, AgentConfig, LlmProvider, ToolRegistry};

use crate::loader::LoaderConfig;
use crate::session::DatasetSession;
use crate::svckit::{
    AverageTool, CountValuesTool, DescribeTool, GetColumnsTool, LoadCsvTool, MostFrequentTool,
    StdDevTool,
};
use crate::CSV_ANALYST_PROMPT;

/// Analyst configuration
#[derive(Clone, Debug, Default)]
pub struct AnalystConfig {
    /// How `load_csv` reads files
    pub loader: LoaderConfig,

    /// Reasoning loop settings
    pub agent: AgentConfig,
}

/// Register the dataset tools against one session
pub fn dataset_tools(session: &Arc<DatasetSession>) -> ToolRegistry {
    let mut tools = ToolRegistry::new();
    tools.register(LoadCsvTool::new(Arc::clone(session)));
    tools.register(GetColumnsTool::new(Arc::clone(session)));
    tools.register(DescribeTool::new(Arc::clone(session)));
    tools.register(AverageTool::new(Arc::clone(session)));
    tools.register(StdDevTool::new(Arc::clone(session)));
    tools.register(CountValuesTool::new(Arc::clone(session)));
    tools.register(MostFrequentTool::new(Arc::clone(session)));
    tools
}

/// The request handed to the agent: analyst instructions, the question and
/// the file the question is about.
pub fn request_prompt(question: &str, file_path: &str) -> String {
    format!(
        "{CSV_ANALYST_PROMPT}\nThe user has asked: {question}\nThe designed file is {file_path}."
    )
}

/// Runs questions about CSV files through the agent loop
pub struct DataAnalyst {
    provider: Arc<dyn LlmProvider>,
    config: AnalystConfig,
}

impl DataAnalyst {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self::with_config(provider, AnalystConfig::default())
    }

    pub const fn with_config(provider: Arc<dyn LlmProvider>, config: AnalystConfig) -> Self {
        Self { provider, config }
    }

    pub const fn config(&self) -> &AnalystConfig {
        &self.config
    }

    /// A fresh, empty session with tools bound to it
    pub fn toolkit(&self) -> (Arc<DatasetSession>, ToolRegistry) {
        let session = Arc::new(DatasetSession::with_loader(self.config.loader.clone()));
        let tools = dataset_tools(&session);
        (session, tools)
    }

    /// An agent over a fresh session
    pub fn agent(&self) -> agent_core::Result<(Arc<DatasetSession>, Agent)> {
        let (session, tools) = self.toolkit();
        let agent = AgentBuilder::new()
            .provider(Arc::clone(&self.provider))
            .tools(tools)
            .config(self.config.agent.clone())
            .build()?;
        Ok((session, agent))
    }

    /// Answer a question about one CSV file
    pub async fn run(&self, file_path: &str, question: &str) -> agent_core::Result<String> {
        let (_session, agent) = self.agent()?;
        tracing::info!(
            file = %file_path,
            model = %self.config.agent.generation.model,
            "Starting analysis"
        );
        agent.ask(&request_prompt(question, file_path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::provider::{Completion, GenerationOptions, ModelInfo};
    use agent_core::{Message, ToolCall};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::io::Write;
    use std::sync::Mutex;

    /// Replays canned model turns and records what it was sent
    struct ScriptedProvider {
        replies: Mutex<VecDeque<String>>,
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<String>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn health_check(&self) -> agent_core::Result<bool> {
            Ok(true)
        }

        async fn complete(
            &self,
            messages: &[Message],
            options: &GenerationOptions,
        ) -> agent_core::Result<Completion> {
            self.seen.lock().unwrap().push(messages.to_vec());
            let reply = self.replies.lock().unwrap().pop_front().unwrap_or_default();
            Ok(Completion::new(reply, options.model.clone()))
        }

        async fn list_models(&self) -> agent_core::Result<Vec<ModelInfo>> {
            Ok(Vec::new())
        }
    }

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn literal_paths() -> AnalystConfig {
        AnalystConfig {
            loader: LoaderConfig {
                space_placeholder: None,
                ..LoaderConfig::default()
            },
            ..AnalystConfig::default()
        }
    }

    #[test]
    fn test_request_prompt() {
        let prompt = request_prompt("What is the mean score?", "scores.csv");
        assert!(prompt.starts_with(CSV_ANALYST_PROMPT));
        assert!(prompt.ends_with(
            "\nThe user has asked: What is the mean score?\nThe designed file is scores.csv."
        ));
    }

    #[test]
    fn test_toolkit_registers_every_tool() {
        let analyst = DataAnalyst::new(ScriptedProvider::new(Vec::new()));
        let (_session, tools) = analyst.toolkit();
        assert_eq!(
            tools.names(),
            vec![
                "load_csv",
                "get_columns",
                "describe_csv",
                "average_col",
                "st_dev_col",
                "count_elem",
                "most_pop_elem",
            ]
        );
    }

    #[tokio::test]
    async fn test_each_toolkit_gets_its_own_slot() {
        let file = csv_file("a\n1\n");
        let analyst = DataAnalyst::with_config(ScriptedProvider::new(Vec::new()), literal_paths());

        let (first, first_tools) = analyst.toolkit();
        let (second, second_tools) = analyst.toolkit();

        first_tools
            .execute(&ToolCall::new("load_csv", file.path().to_string_lossy()))
            .await
            .unwrap();

        assert!(first.is_loaded().await);
        assert!(!second.is_loaded().await);
        let result = second_tools.execute(&ToolCall::new("get_columns", "")).await.unwrap();
        assert_eq!(result.output, "Error: No dataframe loaded. Please load a CSV file first.");
    }

    #[tokio::test]
    async fn test_tools_before_load() {
        let analyst = DataAnalyst::new(ScriptedProvider::new(Vec::new()));
        let (_session, tools) = analyst.toolkit();

        for name in [
            "get_columns",
            "describe_csv",
            "average_col",
            "st_dev_col",
            "count_elem",
            "most_pop_elem",
        ] {
            let result = tools.execute(&ToolCall::new(name, "score")).await.unwrap();
            assert!(!result.success);
            assert_eq!(
                result.output,
                "Error: No dataframe loaded. Please load a CSV file first."
            );
        }
    }

    #[tokio::test]
    async fn test_zero_iterations_rejected() {
        let mut config = literal_paths();
        config.agent.max_iterations = 0;
        let analyst = DataAnalyst::with_config(ScriptedProvider::new(Vec::new()), config);

        let result = analyst.run("scores.csv", "anything").await;
        assert!(matches!(result, Err(agent_core::AgentError::Config(_))));
    }

    #[tokio::test]
    async fn test_run_end_to_end() {
        let file = csv_file("name,score\nann,1\nbob,2\ncid,2\n");
        let path = file.path().to_string_lossy().into_owned();

        let provider = ScriptedProvider::new(vec![
            format!("Thought: load first\nAction: load_csv\nAction Input: {path}"),
            "Thought: check columns\nAction: get_columns\nAction Input: ".into(),
            "Thought: compute\nAction: average_col\nAction Input: \"score\"".into(),
            "Thought: I now know the final answer\nFinal Answer: The average score is about 1.67."
                .into(),
        ]);
        let analyst = DataAnalyst::with_config(provider.clone(), literal_paths());

        let answer = analyst.run(&path, "What is the average score?").await.unwrap();
        assert_eq!(answer, "The average score is about 1.67.");

        let seen = provider.seen.lock().unwrap();
        let last_turn = seen.last().unwrap();
        let observations: Vec<&str> = last_turn
            .iter()
            .filter(|m| m.role == agent_core::Role::Tool)
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(
            observations,
            vec![
                "Observation: File loaded successfully as a dataframe with 3 rows and 2 columns",
                "Observation: Available columns: ['name', 'score']",
                "Observation: Average of column 'score': 1.6666666666666667",
            ]
        );

        let request = &last_turn[1].content;
        assert!(request.contains("The user has asked: What is the average score?"));
    }
}
