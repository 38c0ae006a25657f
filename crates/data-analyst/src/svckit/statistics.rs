//! Column Statistics Tools

use std::sync::Arc;

use agent_core::{Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema};
use async_trait::async_trait;

use super::{column_schema, dispatch};
use crate::session::{DatasetCommand, DatasetSession};

/// Mean of a numeric column
pub struct AverageTool {
    session: Arc<DatasetSession>,
}

impl AverageTool {
    pub const fn new(session: Arc<DatasetSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Tool for AverageTool {
    fn schema(&self) -> ToolSchema {
        column_schema("average_col", "Returns the average value of a column.")
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let command = DatasetCommand::Average(call.input.clone());
        Ok(dispatch("average_col", &self.session, command).await)
    }
}

/// Sample standard deviation of a numeric column
pub struct StdDevTool {
    session: Arc<DatasetSession>,
}

impl StdDevTool {
    pub const fn new(session: Arc<DatasetSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Tool for StdDevTool {
    fn schema(&self) -> ToolSchema {
        column_schema("st_dev_col", "Returns the standard deviation of a column.")
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let command = DatasetCommand::StdDev(call.input.clone());
        Ok(dispatch("st_dev_col", &self.session, command).await)
    }
}
