//! # data-analyst
//!
//! CSV analysis tools for a ReAct agent.
//!
//! ## How a request flows
//!
//! ```text
//! ┌──────────────┐   Action: average_col    ┌───────────────┐
//! │  Agent loop  │ ───────────────────────▶ │  AverageTool  │
//! │ (agent-core) │ ◀─────────────────────── │   (svckit)    │
//! └──────────────┘   Observation: <string>  └───────┬───────┘
//!                                                   │ DatasetCommand::Average
//!                                                   ▼
//!                                           ┌───────────────┐
//!                                           │DatasetSession │  Result<Outcome, AnalystError>
//!                                           │Option<Dataset>│
//!                                           └───────────────┘
//! ```
//!
//! Tools only deal in strings. Below them everything is typed: commands,
//! outcomes and errors are enums, and each session holds at most one dataset.

pub mod analyst;
pub mod error;
pub mod loader;
pub mod model;
pub mod render;
pub mod session;
pub mod stats;
pub mod svckit;

pub use analyst::{dataset_tools, request_prompt, AnalystConfig, DataAnalyst};
pub use error::{AnalystError, Reduction, Result};
pub use loader::LoaderConfig;
pub use model::{Column, ColumnData, ColumnKind, Dataset, Value};
pub use session::{DatasetCommand, DatasetSession, Outcome};
pub use stats::Description;

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{
        AverageTool, CountValuesTool, DescribeTool, GetColumnsTool, LoadCsvTool,
        MostFrequentTool, StdDevTool,
    };
}

/// Instructions prepended to every analyst request
pub const CSV_ANALYST_PROMPT: &str = r#"You are a data analysis agent that answers questions about CSV datasets. Be accurate, methodical and precise.

## Tools

- `load_csv` - Load a CSV file into memory as a dataframe
- `get_columns` - List the column names of the loaded dataframe
- `describe_csv` - Descriptive statistics for every numeric column
- `average_col` - Mean of one column
- `st_dev_col` - Standard deviation of one column
- `count_elem` - How many times each value appears in one column
- `most_pop_elem` - The most frequent value of one column

## Guidelines

1. **Load first** - Always load the file with `load_csv` before any analysis. If no file is given, ask for one. Paths may contain spaces: write `_` for each space and it will be converted.
2. **Understand before analysing** - Use `get_columns` to learn the structure and `describe_csv` for an overview of the distributions.
3. **Be methodical** - Break complex questions into small steps and use the right tool for each one. Combine tool results when needed.
4. **Interpret** - Do not just report numbers; explain what they mean and compare values when relevant (for example, a much larger standard deviation means more variability).
5. **Handle errors** - If a column does not exist, check the available columns with `get_columns` and correct the name. Column names are case-sensitive. If no data is loaded, load it first.
6. **Communicate clearly** - Be concise, use proper statistical terms and explain them when needed. Structure answers as overview, specific findings, conclusions.

## Output Format (VERY IMPORTANT)

To use a tool, respond exactly with:
Action: [the tool name, e.g. load_csv]
Action Input: [the input to the tool]

You will then receive an Observation and decide the next step.
When you have enough information, respond with:
Final Answer: [your complete answer to the user's original question]

Write nothing after "Final Answer:" other than the answer itself.

Remember that you work with a single dataframe held in memory."#;
