//! Value Frequency Tools

use std::sync::Arc;

use agent_core::{Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema};
use async_trait::async_trait;

use super::{column_schema, dispatch};
use crate::session::{DatasetCommand, DatasetSession};

/// Occurrences of every distinct value in a column
pub struct CountValuesTool {
    session: Arc<DatasetSession>,
}

impl CountValuesTool {
    pub const fn new(session: Arc<DatasetSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Tool for CountValuesTool {
    fn schema(&self) -> ToolSchema {
        column_schema(
            "count_elem",
            "Counts each time an element appears in a column.",
        )
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let command = DatasetCommand::CountValues(call.input.clone());
        Ok(dispatch("count_elem", &self.session, command).await)
    }
}

/// The single most frequent value of a column
///
/// Ties go to the value that appears first in the column.
pub struct MostFrequentTool {
    session: Arc<DatasetSession>,
}

impl MostFrequentTool {
    pub const fn new(session: Arc<DatasetSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Tool for MostFrequentTool {
    fn schema(&self) -> ToolSchema {
        column_schema("most_pop_elem", "Returns the most frequent value of a column.")
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let command = DatasetCommand::MostFrequent(call.input.clone());
        Ok(dispatch("most_pop_elem", &self.session, command).await)
    }
}
