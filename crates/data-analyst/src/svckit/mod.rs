//! Service Kit - Agent Tools
//!
//! Dataset tools that implement `agent_core::Tool`. Each one turns its input
//! string into a [`DatasetCommand`], applies it to the shared session and
//! renders the outcome or error as the observation. None of them return
//! `Err`: the agent always gets a usable string back.

mod frequency;
mod inspect;
mod loader;
mod statistics;

pub use frequency::{CountValuesTool, MostFrequentTool};
pub use inspect::{DescribeTool, GetColumnsTool};
pub use loader::LoadCsvTool;
pub use statistics::{AverageTool, StdDevTool};

use agent_core::{ToolResult, ToolSchema};

use crate::session::{DatasetCommand, DatasetSession};

/// Apply a command and render the result for the agent
async fn dispatch(tool: &str, session: &DatasetSession, command: DatasetCommand) -> ToolResult {
    tracing::debug!(tool, command = command.name(), "Dataset tool invoked");

    match session.apply(command).await {
        Ok(outcome) => ToolResult::success(tool, outcome.to_string()),
        Err(e) => {
            tracing::debug!(tool, error = %e, "Dataset tool returned an error observation");
            ToolResult::failure(tool, e.to_string())
        }
    }
}

/// Schema for a tool whose input names a column
fn column_schema(name: &str, description: &str) -> ToolSchema {
    ToolSchema {
        name: name.into(),
        description: description.into(),
        input: "the exact, case-sensitive column name".into(),
        input_required: false,
        category: Some("dataset".into()),
        has_side_effects: false,
    }
}

/// Schema for a tool that ignores its input
fn unit_schema(name: &str, description: &str) -> ToolSchema {
    ToolSchema {
        name: name.into(),
        description: description.into(),
        input: "ignored, pass an empty string".into(),
        input_required: false,
        category: Some("dataset".into()),
        has_side_effects: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::{Tool, ToolCall};
    use std::io::Write;
    use std::sync::Arc;

    use crate::loader::LoaderConfig;

    #[test]
    fn test_inputs_never_required() {
        let session = Arc::new(DatasetSession::new());
        let tools: Vec<Box<dyn Tool>> = vec![
            Box::new(LoadCsvTool::new(Arc::clone(&session))),
            Box::new(GetColumnsTool::new(Arc::clone(&session))),
            Box::new(DescribeTool::new(Arc::clone(&session))),
            Box::new(AverageTool::new(Arc::clone(&session))),
            Box::new(StdDevTool::new(Arc::clone(&session))),
            Box::new(CountValuesTool::new(Arc::clone(&session))),
            Box::new(MostFrequentTool::new(Arc::clone(&session))),
        ];

        for tool in &tools {
            let schema = tool.schema();
            assert!(!schema.input_required, "{}", schema.name);
            assert_eq!(schema.has_side_effects, schema.name == "load_csv");
        }
    }

    #[tokio::test]
    async fn test_errors_become_failed_observations() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"milk,litres\nwhole,3\nskim,\n").unwrap();

        let session = Arc::new(DatasetSession::with_loader(LoaderConfig {
            space_placeholder: None,
            ..LoaderConfig::default()
        }));
        let load = LoadCsvTool::new(Arc::clone(&session));
        let average = AverageTool::new(Arc::clone(&session));

        let result = load
            .execute(&ToolCall::new("load_csv", file.path().to_string_lossy()))
            .await
            .unwrap();
        assert!(result.success);

        let result = average.execute(&ToolCall::new("average_col", "milk")).await.unwrap();
        assert!(!result.success);
        assert_eq!(
            result.output,
            "Error: Column 'milk' is not numeric. Cannot calculate average."
        );

        let result = average.execute(&ToolCall::new("average_col", "litres")).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, "Average of column 'litres': 3.0");
    }
}
