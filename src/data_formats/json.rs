//! JSON-lines reader and writer for `train.json`.

use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::data_loader::dataset::{Dataset, DatasetError, Row};

/// Read newline-delimited JSON objects into a [`Dataset`].
///
/// A file whose first non-blank byte is `[` is accepted as one JSON array of
/// row objects instead. Blank lines are skipped.
pub fn read_json(path: &Path) -> Result<Dataset, DatasetError> {
    let raw = fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;

    if raw.trim_start().starts_with('[') {
        let value: Value = serde_json::from_str(&raw).map_err(|source| DatasetError::Json {
            path: path.to_path_buf(),
            line: source.line(),
            source,
        })?;
        let Value::Array(items) = value else {
            return Err(DatasetError::Malformed(format!(
                "{}: expected a JSON array of rows",
                path.display()
            )));
        };
        let rows = items
            .into_iter()
            .enumerate()
            .map(|(i, v)| into_row(v, path, i + 1))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Dataset::from_rows(rows));
    }

    let mut rows = Vec::new();
    for (i, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line).map_err(|source| DatasetError::Json {
            path: path.to_path_buf(),
            line: i + 1,
            source,
        })?;
        rows.push(into_row(value, path, i + 1)?);
    }
    Ok(Dataset::from_rows(rows))
}

fn into_row(value: Value, path: &Path, line: usize) -> Result<Row, DatasetError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(DatasetError::Malformed(format!(
            "{} line {line}: expected a JSON object per row, found {}",
            path.display(),
            kind(&other)
        ))),
    }
}

pub(crate) fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Write every row as one compact JSON object per line.
pub fn write_json_lines(dataset: &Dataset, path: &Path) -> Result<(), DatasetError> {
    let file = File::create(path).map_err(|e| DatasetError::io(path, e))?;
    let mut out = BufWriter::new(file);
    for row in dataset.rows() {
        serde_json::to_writer(&mut out, row).map_err(|e| DatasetError::io(path, e.into()))?;
        out.write_all(b"\n").map_err(|e| DatasetError::io(path, e))?;
    }
    out.flush().map_err(|e| DatasetError::io(path, e))?;
    Ok(())
}
