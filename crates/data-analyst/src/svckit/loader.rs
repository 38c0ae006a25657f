//! CSV Loader Tool

use std::sync::Arc;

use agent_core::{Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema};
use async_trait::async_trait;

use super::dispatch;
use crate::session::{DatasetCommand, DatasetSession};

/// Loads a CSV file into the session, replacing any previous dataset
pub struct LoadCsvTool {
    session: Arc<DatasetSession>,
}

impl LoadCsvTool {
    pub const fn new(session: Arc<DatasetSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Tool for LoadCsvTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "load_csv".into(),
            description: "Load a csv file and save it as a dataframe.".into(),
            input: "path to the CSV file; write '_' wherever the path has a space".into(),
            input_required: false,
            category: Some("dataset".into()),
            has_side_effects: true,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let command = DatasetCommand::Load(call.input.clone());
        Ok(dispatch("load_csv", &self.session, command).await)
    }
}
