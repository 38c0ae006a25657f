//! Dataset Session
//!
//! The single dataset slot for one conversation. Operations are a closed set
//! of [`DatasetCommand`]s producing typed [`Outcome`]s; text only appears when
//! an outcome or error is displayed at the tool boundary.

use std::fmt;

use tokio::sync::RwLock;

use crate::error::{AnalystError, Reduction, Result};
use crate::loader::{self, LoaderConfig};
use crate::model::{Column, Dataset, Value};
use crate::render::py_list;
use crate::stats::{self, Description};

/// One dataset operation with its argument
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatasetCommand {
    /// Raw path as written by the agent
    Load(String),
    Columns,
    Describe,
    Average(String),
    StdDev(String),
    CountValues(String),
    MostFrequent(String),
}

impl DatasetCommand {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Load(_) => "load",
            Self::Columns => "columns",
            Self::Describe => "describe",
            Self::Average(_) => "average",
            Self::StdDev(_) => "std_dev",
            Self::CountValues(_) => "count_values",
            Self::MostFrequent(_) => "most_frequent",
        }
    }
}

/// Successful result of a command
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Loaded { rows: usize, columns: usize },
    Columns { names: Vec<String> },
    Described { description: Description },
    Average { column: String, value: f64 },
    StdDev { column: String, value: f64 },
    ValueCounts { column: String, counts: Vec<(Value, usize)> },
    MostFrequent { column: String, value: Value, count: usize },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded { rows, columns } => write!(
                f,
                "File loaded successfully as a dataframe with {rows} rows and {columns} columns"
            ),
            Self::Columns { names } => write!(f, "Available columns: {}", py_list(names)),
            Self::Described { description } => {
                write!(f, "Descriptive statistics:\n{description}")
            }
            Self::Average { column, value } => write!(
                f,
                "Average of column '{column}': {}",
                Value::Float(*value)
            ),
            Self::StdDev { column, value } => write!(
                f,
                "Standard deviation of column '{column}': {}",
                Value::Float(*value)
            ),
            Self::ValueCounts { column, counts } => {
                let entries: Vec<String> = counts
                    .iter()
                    .map(|(value, n)| format!("{}: {n}", value.repr()))
                    .collect();
                write!(f, "Value counts for column '{column}': {{{}}}", entries.join(", "))
            }
            Self::MostFrequent {
                column,
                value,
                count,
            } => write!(
                f,
                "Most popular element in column '{column}': '{value}' (appears {count} times)"
            ),
        }
    }
}

/// Holder of at most one loaded dataset.
///
/// Create one per conversation; a later load replaces the dataset entirely
/// and a failed load leaves it as it was.
#[derive(Debug, Default)]
pub struct DatasetSession {
    slot: RwLock<Option<Dataset>>,
    loader: LoaderConfig,
}

impl DatasetSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_loader(loader: LoaderConfig) -> Self {
        Self {
            slot: RwLock::new(None),
            loader,
        }
    }

    /// Whether a dataset is currently loaded
    pub async fn is_loaded(&self) -> bool {
        self.slot.read().await.is_some()
    }

    /// Apply one command to the slot
    pub async fn apply(&self, command: DatasetCommand) -> Result<Outcome> {
        match command {
            DatasetCommand::Load(raw) => self.load(&raw).await,
            DatasetCommand::Columns => {
                self.read(|ds| {
                    Ok(Outcome::Columns {
                        names: ds.column_names(),
                    })
                })
                .await
            }
            DatasetCommand::Describe => {
                self.read(|ds| {
                    Ok(Outcome::Described {
                        description: Description::of(ds),
                    })
                })
                .await
            }
            DatasetCommand::Average(column) => {
                self.read(|ds| {
                    let values = numeric(ds, &column, Reduction::Average)?;
                    Ok(Outcome::Average {
                        value: stats::mean(&values),
                        column,
                    })
                })
                .await
            }
            DatasetCommand::StdDev(column) => {
                self.read(|ds| {
                    let values = numeric(ds, &column, Reduction::StdDev)?;
                    Ok(Outcome::StdDev {
                        value: stats::std_dev(&values),
                        column,
                    })
                })
                .await
            }
            DatasetCommand::CountValues(column) => {
                self.read(|ds| {
                    let counts = lookup(ds, &column)?.value_counts();
                    Ok(Outcome::ValueCounts { column, counts })
                })
                .await
            }
            DatasetCommand::MostFrequent(column) => {
                self.read(|ds| {
                    let (value, count) = lookup(ds, &column)?
                        .value_counts()
                        .into_iter()
                        .next()
                        .ok_or_else(|| AnalystError::EmptyColumn(column.clone()))?;
                    Ok(Outcome::MostFrequent {
                        column,
                        value,
                        count,
                    })
                })
                .await
            }
        }
    }

    async fn load(&self, raw: &str) -> Result<Outcome> {
        let config = self.loader.clone();
        let raw = raw.to_string();

        // file IO and parsing stay off the async workers
        let (path, dataset) = tokio::task::spawn_blocking(move || {
            let path = config.resolve_path(&raw);
            loader::load_path(&path, &config).map(|dataset| (path, dataset))
        })
        .await
        .map_err(|e| AnalystError::LoadFailure(e.to_string()))??;

        let outcome = Outcome::Loaded {
            rows: dataset.row_count(),
            columns: dataset.column_count(),
        };
        tracing::info!(
            path = %path.display(),
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "Dataset loaded"
        );

        *self.slot.write().await = Some(dataset);
        Ok(outcome)
    }

    async fn read<F>(&self, op: F) -> Result<Outcome>
    where
        F: FnOnce(&Dataset) -> Result<Outcome>,
    {
        let guard = self.slot.read().await;
        let dataset = guard.as_ref().ok_or(AnalystError::NoDatasetLoaded)?;
        op(dataset)
    }
}

fn lookup<'a>(dataset: &'a Dataset, column: &str) -> Result<&'a Column> {
    dataset
        .column(column)
        .ok_or_else(|| AnalystError::ColumnNotFound {
            column: column.to_string(),
            available: dataset.column_names(),
        })
}

fn numeric(dataset: &Dataset, column: &str, reduction: Reduction) -> Result<Vec<f64>> {
    lookup(dataset, column)?
        .numeric_values()
        .ok_or_else(|| AnalystError::ColumnNotNumeric {
            column: column.to_string(),
            reduction,
        })
}
