//! Descriptive Statistics
//!
//! Reductions skip missing values. Standard deviation is the sample
//! estimate (n - 1); quantiles interpolate linearly between order statistics.

use crate::model::{Column, ColumnKind, Dataset};
use crate::render::{render_table, table_float};

/// Arithmetic mean, `NaN` for no values
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation, `NaN` below two values
#[allow(clippy::cast_precision_loss)]
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Linear-interpolated quantile of already sorted values
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Summary of one numeric column
#[derive(Clone, Debug, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl NumericSummary {
    pub fn from_values(values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            count: sorted.len(),
            mean: mean(&sorted),
            std: std_dev(&sorted),
            min: sorted.first().copied().unwrap_or(f64::NAN),
            q25: quantile(&sorted, 0.25),
            q50: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted.last().copied().unwrap_or(f64::NAN),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn cells(&self) -> Vec<String> {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.q50,
            self.q75,
            self.max,
        ]
        .into_iter()
        .map(table_float)
        .collect()
    }
}

/// Summary of one text column
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoricalSummary {
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: usize,
}

impl CategoricalSummary {
    pub fn from_column(column: &Column) -> Self {
        let counts = column.value_counts();
        Self {
            count: column.count(),
            unique: counts.len(),
            top: counts.first().map(|(v, _)| v.to_string()),
            freq: counts.first().map_or(0, |(_, n)| *n),
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.count.to_string(),
            self.unique.to_string(),
            self.top.clone().unwrap_or_else(|| "NaN".into()),
            if self.top.is_some() { self.freq.to_string() } else { "NaN".into() },
        ]
    }
}

/// `describe` output: integer and float columns when any exist, every
/// column as categorical otherwise. Boolean columns never get the numeric
/// summary.
#[derive(Clone, Debug, PartialEq)]
pub enum Description {
    Numeric(Vec<(String, NumericSummary)>),
    Categorical(Vec<(String, CategoricalSummary)>),
}

const NUMERIC_ROWS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
const CATEGORICAL_ROWS: [&str; 4] = ["count", "unique", "top", "freq"];

impl Description {
    pub fn of(dataset: &Dataset) -> Self {
        let numeric: Vec<_> = dataset
            .columns()
            .iter()
            .filter(|c| matches!(c.kind(), ColumnKind::Integer | ColumnKind::Float))
            .filter_map(|c| {
                c.numeric_values()
                    .map(|values| (c.name.clone(), NumericSummary::from_values(&values)))
            })
            .collect();

        if numeric.is_empty() {
            Self::Categorical(
                dataset
                    .columns()
                    .iter()
                    .map(|c| (c.name.clone(), CategoricalSummary::from_column(c)))
                    .collect(),
            )
        } else {
            Self::Numeric(numeric)
        }
    }

    /// Plain-text table, one column per summarised dataset column
    pub fn to_table(&self) -> String {
        match self {
            Self::Numeric(cols) => {
                let columns: Vec<_> = cols.iter().map(|(n, s)| (n.clone(), s.cells())).collect();
                render_table(&NUMERIC_ROWS, &columns)
            }
            Self::Categorical(cols) => {
                let columns: Vec<_> = cols.iter().map(|(n, s)| (n.clone(), s.cells())).collect();
                render_table(&CATEGORICAL_ROWS, &columns)
            }
        }
    }
}

impl std::fmt::Display for Description {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_table())
    }
}
