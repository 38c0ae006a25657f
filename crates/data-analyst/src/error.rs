//! Error Types for the Data Analyst
//!
//! Every variant renders to the exact observation string the agent sees.

use thiserror::Error;

use crate::render::py_list;

pub type Result<T> = std::result::Result<T, AnalystError>;

/// Numeric reduction that requires a numeric column
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reduction {
    Average,
    StdDev,
}

impl std::fmt::Display for Reduction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Average => write!(f, "average"),
            Self::StdDev => write!(f, "standard deviation"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalystError {
    #[error("Error: No dataframe loaded. Please load a CSV file first.")]
    NoDatasetLoaded,

    #[error("Error: Column '{column}' not found. Available columns: {}", py_list(.available))]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    #[error("Error: Column '{column}' is not numeric. Cannot calculate {reduction}.")]
    ColumnNotNumeric {
        column: String,
        reduction: Reduction,
    },

    #[error("Error: Column '{0}' has no values.")]
    EmptyColumn(String),

    #[error("Error loading file: {0}")]
    LoadFailure(String),
}
