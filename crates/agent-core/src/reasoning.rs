//! Reasoning Loop
//!
//! Implements the ReAct (Reason + Act) text protocol. The model answers with
//! `Action:` / `Action Input:` lines to call a tool, receives an
//! `Observation:`, and finishes with `Final Answer:`.

use std::sync::Arc;

use crate::error::{AgentError, Result};
use crate::message::{Conversation, Message, Role};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::tool::{ToolCall, ToolRegistry, ToolResult};

const ACTION: &str = "Action:";
const ACTION_INPUT: &str = "Action Input:";
const FINAL_ANSWER: &str = "Final Answer:";
const OBSERVATION: &str = "Observation:";

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System prompt preamble
    pub system_prompt: String,

    /// Maximum reasoning iterations before giving up
    pub max_iterations: usize,

    /// Generation options
    pub generation: GenerationOptions,

    /// Whether to append tool descriptions to system prompt
    pub inject_tool_descriptions: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_iterations: 10,
            generation: GenerationOptions {
                stop_sequences: vec![format!("\n{OBSERVATION}")],
                ..GenerationOptions::default()
            },
            inject_tool_descriptions: true,
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = "Answer the following questions as best you can.";

/// One parsed model turn
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Call a tool with the given input
    Action(ToolCall),

    /// Stop with this answer
    Finish(String),

    /// Output did not follow the protocol; the text is fed back as the observation
    Malformed(String),
}

/// Parse one model turn.
pub fn parse_step(content: &str) -> Step {
    let content = content.split(&format!("\n{OBSERVATION}")).next().unwrap_or_default();
    let final_idx = content.find(FINAL_ANSWER);
    let action_idx = content.find(ACTION);

    match (action_idx, final_idx) {
        (Some(_), Some(_)) => Step::Malformed(
            "Parsing LLM output produced both a final answer and a parse-able action. \
             Reply with either an Action or a Final Answer, not both."
                .into(),
        ),
        (None, Some(idx)) => {
            Step::Finish(content[idx + FINAL_ANSWER.len()..].trim().to_string())
        }
        (Some(idx), None) => {
            let after_action = &content[idx + ACTION.len()..];
            let Some(input_idx) = after_action.find(ACTION_INPUT) else {
                return Step::Malformed(
                    "Invalid Format: Missing 'Action Input:' after 'Action:'".into(),
                );
            };

            let tool = after_action[..input_idx].trim();
            if tool.is_empty() {
                return Step::Malformed("Invalid Format: Missing tool name after 'Action:'".into());
            }

            let input = after_action[input_idx + ACTION_INPUT.len()..]
                .trim()
                .trim_matches('"');

            Step::Action(ToolCall::new(tool, input))
        }
        (None, None) => {
            Step::Malformed("Invalid Format: Missing 'Action:' after 'Thought:'".into())
        }
    }
}

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Build the full system prompt including tool descriptions
    pub fn build_system_prompt(&self) -> String {
        let mut prompt = self.config.system_prompt.clone();

        if self.config.inject_tool_descriptions && !self.tools.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(&self.tools.generate_prompt_section());
            prompt.push_str("\nBegin!");
        }

        prompt
    }

    /// Run the reasoning loop over an existing conversation
    pub async fn run(&self, conversation: &mut Conversation) -> Result<String> {
        if conversation.messages().first().map(|m| m.role) != Some(Role::System) {
            conversation
                .messages_mut()
                .insert(0, Message::system(self.build_system_prompt()));
        }

        for iteration in 1..=self.config.max_iterations {
            let completion = self
                .provider
                .complete(conversation.messages(), &self.config.generation)
                .await?;

            let content = completion.content;
            conversation.push(Message::assistant(&content));

            match parse_step(&content) {
                Step::Finish(answer) => {
                    tracing::debug!(iteration, "Agent reached final answer");
                    return Ok(answer);
                }
                Step::Action(mut call) => {
                    let id = uuid::Uuid::new_v4().to_string();
                    call.id = Some(id.clone());
                    tracing::debug!(
                        iteration,
                        tool = %call.name,
                        input = %call.input,
                        "Executing tool"
                    );

                    let result = self.execute_tool(&call).await;
                    conversation.push(Message::tool(
                        format!("{OBSERVATION} {}", result.output),
                        Some(id),
                    ));
                }
                Step::Malformed(reason) => {
                    tracing::warn!(iteration, %reason, "Could not parse model output");
                    conversation.push(Message::tool(format!("{OBSERVATION} {reason}"), None));
                }
            }
        }

        Err(AgentError::MaxIterations(self.config.max_iterations))
    }

    /// Run with a simple string input (creates temporary conversation)
    pub async fn ask(&self, question: &str) -> Result<String> {
        let mut conversation = Conversation::with_system_prompt(self.build_system_prompt());
        conversation.push(Message::user(format!("Question: {question}")));
        self.run(&mut conversation).await
    }

    /// Execute a tool call; every failure becomes an observation string
    async fn execute_tool(&self, call: &ToolCall) -> ToolResult {
        match self.tools.execute(call).await {
            Ok(result) => result.with_id(call.id.clone().unwrap_or_default()),
            Err(AgentError::ToolNotFound(name)) => ToolResult::failure(
                name.clone(),
                format!(
                    "{name} is not a valid tool, try one of [{}].",
                    self.tools.names().join(", ")
                ),
            ),
            Err(e) => ToolResult::failure(call.name.clone(), format!("Error: {e}")),
        }
    }

    /// Get configuration
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }

    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    #[must_use]
    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    /// Replace the whole configuration
    #[must_use]
    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    #[must_use]
    pub const fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        if self.config.max_iterations == 0 {
            return Err(AgentError::Config("max_iterations must be at least 1".into()));
        }

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Completion, ModelInfo};
    use crate::tool::{Tool, ToolSchema};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct ScriptedProvider {
        replies: Mutex<VecDeque<String>>,
    }

    impl ScriptedProvider {
        fn new(replies: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.iter().map(|r| (*r).to_string()).collect()),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        async fn complete(
            &self,
            _messages: &[Message],
            options: &GenerationOptions,
        ) -> Result<Completion> {
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| "Thought: still thinking".into());
            Ok(Completion::new(reply, options.model.clone()))
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>> {
            Ok(Vec::new())
        }
    }

    struct UpperTool;

    #[async_trait]
    impl Tool for UpperTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "upper".into(),
                description: "Uppercase the input.".into(),
                input: "text".into(),
                input_required: true,
                category: None,
                has_side_effects: false,
            }
        }

        async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
            Ok(ToolResult::success("upper", call.input.to_uppercase()))
        }
    }

    #[test]
    fn test_parse_action() {
        let step = parse_step(
            "Thought: I should load it\nAction: load_csv\nAction Input: \"data/sales.csv\"\n",
        );
        assert_eq!(step, Step::Action(ToolCall::new("load_csv", "data/sales.csv")));
    }

    #[test]
    fn test_parse_ignores_hallucinated_observation() {
        let step =
            parse_step("Action: upper\nAction Input: abc\nObservation: ABC\nFinal Answer: ABC");
        assert_eq!(step, Step::Action(ToolCall::new("upper", "abc")));
    }

    #[test]
    fn test_parse_final_answer() {
        let step = parse_step("Thought: done\nFinal Answer: The mean is 4.2");
        assert_eq!(step, Step::Finish("The mean is 4.2".into()));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(parse_step("I think the answer is 4"), Step::Malformed(_)));
        assert!(matches!(parse_step("Action: upper"), Step::Malformed(_)));
        assert!(matches!(
            parse_step("Action: upper\nAction Input: x\nFinal Answer: y"),
            Step::Malformed(_)
        ));
        assert!(matches!(
            parse_step("Final Answer: y\nAction: upper\nAction Input: x"),
            Step::Malformed(_)
        ));
    }

    #[tokio::test]
    async fn test_run_with_tool() {
        let provider = ScriptedProvider::new(&[
            "Thought: use the tool\nAction: upper\nAction Input: hello",
            "Thought: I now know the final answer\nFinal Answer: HELLO",
        ]);
        let agent = AgentBuilder::new()
            .provider(provider)
            .tool(UpperTool)
            .build()
            .unwrap();

        let mut conversation = Conversation::with_system_prompt(agent.build_system_prompt());
        conversation.push(Message::user("Question: shout hello"));
        let answer = agent.run(&mut conversation).await.unwrap();

        assert_eq!(answer, "HELLO");
        let observation = &conversation.messages()[3];
        assert_eq!(observation.role, Role::Tool);
        assert_eq!(observation.content, "Observation: HELLO");
    }

    #[tokio::test]
    async fn test_unknown_tool_and_bad_format_are_observations() {
        let provider = ScriptedProvider::new(&[
            "Action: shout\nAction Input: hi",
            "just chatting",
            "Final Answer: gave up politely",
        ]);
        let agent = AgentBuilder::new()
            .provider(provider)
            .tool(UpperTool)
            .build()
            .unwrap();

        let mut conversation = Conversation::new();
        conversation.push(Message::user("Question: anything"));
        let answer = agent.run(&mut conversation).await.unwrap();

        assert_eq!(answer, "gave up politely");
        let contents: Vec<_> = conversation.messages().iter().map(|m| m.content.clone()).collect();
        let unknown = "Observation: shout is not a valid tool, try one of [upper].";
        assert!(contents.iter().any(|c| c == unknown));
        assert!(contents.iter().any(|c| c.starts_with("Observation: Invalid Format")));
    }

    #[tokio::test]
    async fn test_max_iterations() {
        let provider = ScriptedProvider::new(&[]);
        let agent = AgentBuilder::new()
            .provider(provider)
            .max_iterations(3)
            .build()
            .unwrap();

        let result = agent.ask("loop forever").await;
        assert!(matches!(result, Err(AgentError::MaxIterations(3))));
    }

    #[test]
    fn test_builder_requires_provider() {
        assert!(matches!(AgentBuilder::new().build(), Err(AgentError::Config(_))));
    }

    #[test]
    fn test_builder_rejects_zero_iterations() {
        let config = AgentConfig {
            max_iterations: 0,
            ..AgentConfig::default()
        };
        let built = AgentBuilder::new()
            .provider(ScriptedProvider::new(&[]))
            .config(config)
            .build();
        assert!(matches!(built, Err(AgentError::Config(_))));
    }

    #[test]
    fn test_system_prompt_lists_tools() {
        let agent = AgentBuilder::new()
            .provider(ScriptedProvider::new(&[]))
            .tool(UpperTool)
            .system_prompt("You are terse.")
            .build()
            .unwrap();

        let prompt = agent.build_system_prompt();
        assert!(prompt.starts_with("You are terse.\n\n"));
        assert!(prompt.contains("upper: Uppercase the input."));
        assert!(prompt.ends_with("Begin!"));
        assert_eq!(agent.config().generation.stop_sequences, vec!["\nObservation:"]);
    }
}
