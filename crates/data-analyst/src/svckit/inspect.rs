//! Dataset Inspection Tools
//!
//! Column listing and descriptive statistics.

use std::sync::Arc;

use agent_core::{Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema};
use async_trait::async_trait;

use super::{dispatch, unit_schema};
use crate::session::{DatasetCommand, DatasetSession};

/// Lists the loaded dataset's columns in order
pub struct GetColumnsTool {
    session: Arc<DatasetSession>,
}

impl GetColumnsTool {
    pub const fn new(session: Arc<DatasetSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Tool for GetColumnsTool {
    fn schema(&self) -> ToolSchema {
        unit_schema("get_columns", "Returns the columns of a dataframe.")
    }

    async fn execute(&self, _call: &ToolCall) -> CoreResult<ToolResult> {
        Ok(dispatch("get_columns", &self.session, DatasetCommand::Columns).await)
    }
}

/// count / mean / std / quartiles for every numeric column
pub struct DescribeTool {
    session: Arc<DatasetSession>,
}

impl DescribeTool {
    pub const fn new(session: Arc<DatasetSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Tool for DescribeTool {
    fn schema(&self) -> ToolSchema {
        unit_schema(
            "describe_csv",
            "Returns descriptive statistics for the dataframe.",
        )
    }

    async fn execute(&self, _call: &ToolCall) -> CoreResult<ToolResult> {
        Ok(dispatch("describe_csv", &self.session, DatasetCommand::Describe).await)
    }
}
