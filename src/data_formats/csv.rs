//! `train.csv` reader.
//!
//! The first record is the header. Each column gets one type: integer, float
//! or bool when every non-empty cell in it parses as that type, otherwise
//! string. Empty cells are null whatever the column type.

use serde_json::{Number, Value};
use std::fs::File;
use std::path::Path;

use crate::data_loader::dataset::{Dataset, DatasetError};

/// Type shared by every cell of a CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Bool,
    Text,
}

impl ColumnType {
    fn of_cell(cell: &str) -> Self {
        if cell.parse::<i64>().is_ok() {
            ColumnType::Int
        } else if cell.parse::<f64>().is_ok_and(f64::is_finite) {
            ColumnType::Float
        } else if parse_bool(cell).is_some() {
            ColumnType::Bool
        } else {
            ColumnType::Text
        }
    }

    /// Narrowest type every non-empty cell fits. Integers widen to float;
    /// any other mix falls back to text.
    pub fn infer<'a>(cells: impl IntoIterator<Item = &'a str>) -> Self {
        let mut column: Option<ColumnType> = None;
        for cell in cells.into_iter().filter(|c| !c.is_empty()) {
            let cell_type = Self::of_cell(cell);
            column = Some(match (column, cell_type) {
                (None, t) => t,
                (Some(a), b) if a == b => a,
                (Some(ColumnType::Int), ColumnType::Float)
                | (Some(ColumnType::Float), ColumnType::Int) => ColumnType::Float,
                _ => return ColumnType::Text,
            });
        }
        column.unwrap_or(ColumnType::Text)
    }

    /// Convert one cell of a column of this type.
    pub fn value(self, cell: &str) -> Value {
        if cell.is_empty() {
            return Value::Null;
        }
        let typed = match self {
            ColumnType::Int => cell.parse::<i64>().ok().map(Value::from),
            ColumnType::Float => cell
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number),
            ColumnType::Bool => parse_bool(cell).map(Value::Bool),
            ColumnType::Text => None,
        };
        typed.unwrap_or_else(|| Value::String(cell.to_string()))
    }
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Read a headered CSV file into a [`Dataset`].
pub fn read_csv(path: &Path) -> Result<Dataset, DatasetError> {
    let file = File::open(path).map_err(|e| DatasetError::io(path, e))?;
    let csv_err = |source: ::csv::Error| DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(file);
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();
    let records = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_err)?;

    let columns = headers
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let cells = || records.iter().map(move |r| r.get(i).unwrap_or(""));
            let column_type = ColumnType::infer(cells());
            let values: Vec<Value> = cells().map(|c| column_type.value(c)).collect();
            (name, values)
        })
        .collect();
    Dataset::from_columns(columns)
}
