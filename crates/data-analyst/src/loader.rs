//! CSV Loader
//!
//! Reads a comma-separated file with a header row into a typed [`Dataset`].

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{AnalystError, Result};
use crate::model::{Column, ColumnData, Dataset};

/// Cell texts treated as missing values
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#NA", "<NA>", "N/A", "NA", "NULL", "NaN", "-NaN", "nan", "-nan", "n/a", "null",
    "None",
];

/// Loader options
#[derive(Clone, Debug)]
pub struct LoaderConfig {
    /// Sequence in the incoming path that stands for a space
    pub space_placeholder: Option<String>,

    /// Field delimiter
    pub delimiter: u8,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            space_placeholder: Some("_".into()),
            delimiter: b',',
        }
    }
}

impl LoaderConfig {
    /// Rewrite the placeholder in the raw tool input to a space.
    ///
    /// Agents cannot always emit literal spaces in an `Action Input:` line.
    pub fn normalize_path(&self, raw: &str) -> String {
        match self.space_placeholder.as_deref() {
            Some(placeholder) if !placeholder.is_empty() => raw.replace(placeholder, " "),
            _ => raw.to_string(),
        }
    }

    /// Filesystem path for the raw tool input.
    ///
    /// The rewritten path wins; the input as written is used only when the
    /// rewritten path does not exist and the literal one does, so files
    /// whose names really contain the placeholder still load.
    pub fn resolve_path(&self, raw: &str) -> PathBuf {
        let rewritten = PathBuf::from(self.normalize_path(raw));
        let literal = Path::new(raw);
        if !rewritten.exists() && literal.exists() {
            literal.to_path_buf()
        } else {
            rewritten
        }
    }
}

/// Load a CSV file from disk
pub fn load_path(path: &Path, config: &LoaderConfig) -> Result<Dataset> {
    let file = std::fs::File::open(path)
        .map_err(|e| AnalystError::LoadFailure(format!("{e}: '{}'", path.display())))?;
    load_reader(file, config)
}

/// Load CSV from any reader.
///
/// Short rows are padded with missing values; rows with more fields than the
/// header are rejected.
pub fn load_reader<R: Read>(reader: R, config: &LoaderConfig) -> Result<Dataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(config.delimiter)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| AnalystError::LoadFailure(e.to_string()))?
        .clone();

    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(AnalystError::LoadFailure(
            "No columns to parse from file".into(),
        ));
    }

    let names = column_names(headers.iter());
    let width = names.len();
    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); width];

    for record in csv_reader.records() {
        let record = record.map_err(|e| AnalystError::LoadFailure(e.to_string()))?;

        if record.len() > width {
            let line = record.position().map_or(0, csv::Position::line);
            return Err(AnalystError::LoadFailure(format!(
                "Error tokenizing data. Expected {width} fields in line {line}, saw {}",
                record.len()
            )));
        }

        for (i, column) in cells.iter_mut().enumerate() {
            let cell = record.get(i).filter(|c| !NA_VALUES.contains(c));
            column.push(cell.map(str::to_string));
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| Column::new(name, infer(raw)))
        .collect();

    Dataset::from_columns(columns)
        .ok_or_else(|| AnalystError::LoadFailure("columns have different lengths".into()))
}

/// Blank headers become `Unnamed: {i}`; repeated names get `.1`, `.2`, ...
fn column_names<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();

    headers
        .enumerate()
        .map(|(i, raw)| {
            let base = if raw.trim().is_empty() {
                format!("Unnamed: {i}")
            } else {
                raw.to_string()
            };

            let mut name = base.clone();
            let mut suffix = 1;
            while !seen.insert(name.clone()) {
                name = format!("{base}.{suffix}");
                suffix += 1;
            }
            name
        })
        .collect()
}

/// Literals read as booleans
const TRUE_VALUES: &[&str] = &["True", "true", "TRUE"];
const FALSE_VALUES: &[&str] = &["False", "false", "FALSE"];

fn parse_bool(s: &str) -> Option<bool> {
    if TRUE_VALUES.contains(&s) {
        Some(true)
    } else if FALSE_VALUES.contains(&s) {
        Some(false)
    } else {
        None
    }
}

/// Narrowest type that holds every present cell.
///
/// Integers only survive when no cell is missing; a gap turns the column
/// into floats.
fn infer(raw: Vec<Option<String>>) -> ColumnData {
    let present = || raw.iter().flatten().map(|s| s.trim());
    let complete = raw.iter().all(Option::is_some);

    if complete && !raw.is_empty() && present().all(|s| s.parse::<i64>().is_ok()) {
        return ColumnData::Integer(
            raw.iter()
                .map(|c| c.as_deref().and_then(|s| s.trim().parse().ok()))
                .collect(),
        );
    }

    if present().all(|s| s.parse::<f64>().is_ok()) {
        return ColumnData::Float(
            raw.iter()
                .map(|c| c.as_deref().and_then(|s| s.trim().parse().ok()))
                .collect(),
        );
    }

    if present().all(|s| parse_bool(s).is_some()) {
        return ColumnData::Boolean(
            raw.iter()
                .map(|c| c.as_deref().and_then(|s| parse_bool(s.trim())))
                .collect(),
        );
    }

    ColumnData::Text(raw)
}
