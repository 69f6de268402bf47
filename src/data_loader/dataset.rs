//! Core in-memory table used by the loader.
//!
//! A [`Dataset`] is an ordered list of rows. Each row maps a column name to a
//! JSON value, and the column order is remembered so that writing the table
//! back out reproduces it.

use serde_json::{Map, Value};
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// One row: column name → value, in column order.
pub type Row = Map<String, Value>;

/// Error type for every dataset and loader operation.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("dataset file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed JSON in {} (line {line}): {source}", path.display())]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed input: {0}")]
    Malformed(String),

    #[error("invalid split: {0}")]
    Split(String),

    #[error("tokenizer `{name}`: {message}")]
    Tokenizer { name: String, message: String },

    #[error("column `{0}` not found")]
    UnknownColumn(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            DatasetError::MissingFile { path }
        } else {
            DatasetError::Io { path, source }
        }
    }
}

/// Ordered collection of rows sharing one column list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Build a dataset from rows. Columns are listed in first-seen order.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, rows }
    }

    /// Build a dataset from parallel columns. Every column must have the same length.
    pub fn from_columns(columns: Vec<(String, Vec<Value>)>) -> Result<Self, DatasetError> {
        let n_rows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        if let Some((name, values)) = columns.iter().find(|(_, v)| v.len() != n_rows) {
            return Err(DatasetError::Malformed(format!(
                "column `{name}` has {} values, expected {n_rows}",
                values.len()
            )));
        }

        let names: Vec<String> = columns.iter().map(|(n, _)| n.clone()).collect();
        let mut rows: Vec<Row> = (0..n_rows).map(|_| Row::new()).collect();
        for (name, values) in columns {
            for (row, value) in rows.iter_mut().zip(values) {
                row.insert(name.clone(), value);
            }
        }
        Ok(Self { columns: names, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Values of one column, in row order. Rows lacking the column yield `Null`.
    pub fn column<'a>(&'a self, name: &'a str) -> Result<impl Iterator<Item = &'a Value> + 'a, DatasetError> {
        if !self.has_column(name) {
            return Err(DatasetError::UnknownColumn(name.to_string()));
        }
        Ok(self.rows.iter().map(move |r| r.get(name).unwrap_or(&Value::Null)))
    }

    /// Drop the named columns. Unknown names are ignored.
    pub fn remove_columns<S: AsRef<str>>(&mut self, names: &[S]) {
        let doomed = |c: &str| names.iter().any(|n| n.as_ref() == c);
        self.columns.retain(|c| !doomed(c));
        for row in &mut self.rows {
            row.retain(|k, _| !doomed(k));
        }
    }

    /// Append a column. `values` must hold exactly one entry per row.
    pub fn add_column(&mut self, name: &str, values: Vec<Value>) -> Result<(), DatasetError> {
        if self.has_column(name) {
            return Err(DatasetError::Malformed(format!("column `{name}` already exists")));
        }
        if values.len() != self.rows.len() {
            return Err(DatasetError::Malformed(format!(
                "column `{name}` has {} values, expected {}",
                values.len(),
                self.rows.len()
            )));
        }
        self.columns.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.insert(name.to_string(), value);
        }
        Ok(())
    }

    /// New dataset holding the rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Result<Dataset, DatasetError> {
        let rows = indices
            .iter()
            .map(|&i| {
                self.rows
                    .get(i)
                    .cloned()
                    .ok_or_else(|| DatasetError::Split(format!("row index {i} out of range")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Dataset { columns: self.columns.clone(), rows })
    }
}
