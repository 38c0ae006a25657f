//! Tool System
//!
//! Tools are named operations that take a single string input and return a
//! single string output. The reasoning loop picks them by name from the
//! model's text; no structured payload crosses this boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AgentError, Result};

/// Tool call request parsed from the model output
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool identifier
    pub name: String,

    /// Raw input string
    #[serde(default)]
    pub input: String,

    /// Optional call ID for tracking
    #[serde(default)]
    pub id: Option<String>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input: input.into(),
            id: None,
        }
    }
}

/// Result from tool execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool that was called
    pub name: String,

    /// Call ID (if provided in request)
    pub id: Option<String>,

    /// Whether execution succeeded
    pub success: bool,

    /// Output (success message or error)
    pub output: String,
}

impl ToolResult {
    pub fn success(name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: true,
            output: output.into(),
        }
    }

    pub fn failure(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: false,
            output: error.into(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Tool definition schema (shown to the model)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// What the single input string means
    pub input: String,

    /// Whether an empty input is rejected before execution
    #[serde(default)]
    pub input_required: bool,

    /// Category for grouping
    #[serde(default)]
    pub category: Option<String>,

    /// Whether tool has side effects
    #[serde(default)]
    pub has_side_effects: bool,
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's schema
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with the given call
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult>;

    /// Validate the call before execution
    fn validate(&self, call: &ToolCall) -> Result<()> {
        let schema = self.schema();

        if schema.input_required && call.input.trim().is_empty() {
            return Err(AgentError::ToolValidation(format!(
                "Tool '{}' requires an input: {}",
                schema.name, schema.input
            )));
        }

        Ok(())
    }
}

/// Registry for available tools, kept in registration order
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_boxed(Arc::new(tool));
    }

    /// Register a shared tool. A tool with the same name replaces the old one in place.
    pub fn register_boxed(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.schema().name;
        if let Some(&slot) = self.index.get(&name) {
            self.tools[slot] = tool;
        } else {
            self.index.insert(name, self.tools.len());
            self.tools.push(tool);
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&i| Arc::clone(&self.tools[i]))
    }

    /// Execute a tool call
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let tool = self
            .get(&call.name)
            .ok_or_else(|| AgentError::ToolNotFound(call.name.clone()))?;

        tool.validate(call)?;

        tool.execute(call).await
    }

    /// Get all tool schemas in registration order
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(|t| t.schema()).collect()
    }

    /// Get tool names in registration order
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.schema().name).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Generate the system prompt section describing the tools and the
    /// Action / Observation text protocol the reasoning loop parses.
    pub fn generate_prompt_section(&self) -> String {
        let mut prompt = String::from("You have access to the following tools:\n\n");

        for schema in self.schemas() {
            prompt.push_str(&format!(
                "{}: {} Input: {}\n",
                schema.name, schema.description, schema.input
            ));
        }

        let names = self.names().join(", ");
        prompt.push_str("\nUse the following format:\n\n");
        prompt.push_str("Question: the input question you must answer\n");
        prompt.push_str("Thought: you should always think about what to do\n");
        prompt.push_str(&format!(
            "Action: the action to take, should be one of [{names}]\n"
        ));
        prompt.push_str("Action Input: the input to the action\n");
        prompt.push_str("Observation: the result of the action\n");
        prompt.push_str("... (this Thought/Action/Action Input/Observation can repeat N times)\n");
        prompt.push_str("Thought: I now know the final answer\n");
        prompt.push_str("Final Answer: the final answer to the original input question\n");

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool {
        name: &'static str,
        required: bool,
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: self.name.into(),
                description: "Echo the input back.".into(),
                input: "any text".into(),
                input_required: self.required,
                category: None,
                has_side_effects: false,
            }
        }

        async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
            Ok(ToolResult::success(self.name, format!("echo: {}", call.input)))
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool { name: "zeta", required: false });
        registry.register(EchoTool { name: "alpha", required: true });
        registry
    }

    #[test]
    fn test_tool_registry() {
        let registry = registry();

        assert_eq!(registry.len(), 2);
        assert!(registry.get("zeta").is_some());
        assert!(registry.get("alpha").is_some());
        assert!(registry.get("unknown").is_none());
        assert_eq!(registry.names(), vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_reregister_keeps_position() {
        let mut registry = registry();
        registry.register(EchoTool { name: "zeta", required: true });

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["zeta", "alpha"]);
        assert!(registry.schemas()[0].input_required);
    }

    #[tokio::test]
    async fn test_execute() {
        let registry = registry();

        let result = registry.execute(&ToolCall::new("zeta", "hi")).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, "echo: hi");

        let missing = registry.execute(&ToolCall::new("nope", "")).await;
        assert!(matches!(missing, Err(AgentError::ToolNotFound(name)) if name == "nope"));

        let invalid = registry.execute(&ToolCall::new("alpha", "   ")).await;
        assert!(matches!(invalid, Err(AgentError::ToolValidation(_))));
    }

    #[test]
    fn test_prompt_section() {
        let section = registry().generate_prompt_section();

        assert!(section.contains("zeta: Echo the input back. Input: any text\n"));
        assert!(section.contains("should be one of [zeta, alpha]"));
        assert!(section.contains("Final Answer:"));
    }
}
