//! Domain Models
//!
//! A dataset is an ordered list of typed columns of equal length. Missing
//! cells are `None` and are skipped by every reduction.

use std::collections::HashMap;
use std::hash::Hash;

use crate::render::{py_bool, py_float, py_str};

/// Storage for one column
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    /// Every cell is an integer, none missing
    Integer(Vec<Option<i64>>),

    /// Every present cell is a number; all-missing columns land here too
    Float(Vec<Option<f64>>),

    /// Every present cell is a true/false literal
    Boolean(Vec<Option<bool>>),

    /// Anything else, kept verbatim
    Text(Vec<Option<String>>),
}

/// Column type tag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Text,
}

/// A single cell value
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
}

impl Value {
    /// Literal form used inside lists and mappings (`'a'`, `2`, `2.5`, `True`)
    pub fn repr(&self) -> String {
        match self {
            Self::Text(s) => py_str(s),
            other => other.to_string(),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{}", py_float(*v)),
            Self::Boolean(b) => write!(f, "{}", py_bool(*b)),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A named column
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Number of cells, missing included
    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Integer(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn kind(&self) -> ColumnKind {
        match self.data {
            ColumnData::Integer(_) => ColumnKind::Integer,
            ColumnData::Float(_) => ColumnKind::Float,
            ColumnData::Boolean(_) => ColumnKind::Boolean,
            ColumnData::Text(_) => ColumnKind::Text,
        }
    }

    /// Whether reductions apply; booleans count as 0 and 1
    pub const fn is_numeric(&self) -> bool {
        !matches!(self.data, ColumnData::Text(_))
    }

    /// Present values as `f64`; `None` for text columns
    #[allow(clippy::cast_precision_loss)]
    pub fn numeric_values(&self) -> Option<Vec<f64>> {
        match &self.data {
            ColumnData::Integer(v) => Some(v.iter().flatten().map(|&i| i as f64).collect()),
            ColumnData::Float(v) => {
                Some(v.iter().flatten().copied().filter(|f| !f.is_nan()).collect())
            }
            ColumnData::Boolean(v) => {
                Some(v.iter().flatten().map(|&b| f64::from(u8::from(b))).collect())
            }
            ColumnData::Text(_) => None,
        }
    }

    /// Number of present cells
    pub fn count(&self) -> usize {
        match &self.data {
            ColumnData::Integer(v) => v.iter().flatten().count(),
            ColumnData::Float(v) => v.iter().flatten().filter(|f| !f.is_nan()).count(),
            ColumnData::Boolean(v) => v.iter().flatten().count(),
            ColumnData::Text(v) => v.iter().flatten().count(),
        }
    }

    /// Occurrences of each distinct present value, most frequent first.
    /// Equal counts keep the order in which values first appear.
    pub fn value_counts(&self) -> Vec<(Value, usize)> {
        match &self.data {
            ColumnData::Integer(v) => tally(v.iter().flatten().copied())
                .into_iter()
                .map(|(i, n)| (Value::Integer(i), n))
                .collect(),
            ColumnData::Float(v) => tally(
                v.iter()
                    .flatten()
                    .filter(|f| !f.is_nan())
                    // -0.0 and 0.0 are the same value
                    .map(|&f| if f == 0.0 { 0.0_f64.to_bits() } else { f.to_bits() }),
            )
            .into_iter()
            .map(|(bits, n)| (Value::Float(f64::from_bits(bits)), n))
            .collect(),
            ColumnData::Boolean(v) => tally(v.iter().flatten().copied())
                .into_iter()
                .map(|(b, n)| (Value::Boolean(b), n))
                .collect(),
            ColumnData::Text(v) => tally(v.iter().flatten().cloned())
                .into_iter()
                .map(|(s, n)| (Value::Text(s), n))
                .collect(),
        }
    }
}

fn tally<K: Hash + Eq + Clone>(values: impl Iterator<Item = K>) -> Vec<(K, usize)> {
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();

    for value in values {
        if let Some(&slot) = index.get(&value) {
            counts[slot].1 += 1;
        } else {
            index.insert(value.clone(), counts.len());
            counts.push((value, 1));
        }
    }

    // stable: ties stay in first-appearance order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// An in-memory table
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    /// Build from columns; `None` when lengths disagree
    pub fn from_columns(columns: Vec<Column>) -> Option<Self> {
        let rows = columns.first().map_or(0, Column::len);
        if columns.iter().any(|c| c.len() != rows) {
            return None;
        }
        Some(Self { columns, rows })
    }

    pub const fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }
}
