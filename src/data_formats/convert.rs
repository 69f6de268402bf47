//! Normalization of a raw `dataset.json` into `train.json`.
//!
//! The raw file is one JSON array of row objects, as scraped. Rows may nest
//! objects, keep the text as a list of sentences, and prefix field names with
//! `_`. The converter flattens all of that into columns and writes them out
//! as JSON lines.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::{TEXT_JOIN_SEPARATOR, TRAIN_JSON};
use crate::data_formats::json::{kind, write_json_lines};
use crate::data_loader::dataset::{Dataset, DatasetError};

/// Convert `<dir>/<filename>` to `<dir>/train.json` and return the written path.
pub fn convert_list_of_dicts(dir: &Path, filename: &str, text_name: &str) -> Result<PathBuf, DatasetError> {
    let src = dir.join(filename);
    let raw = fs::read_to_string(&src).map_err(|e| DatasetError::io(&src, e))?;
    let data: Value = serde_json::from_str(&raw).map_err(|source| DatasetError::Json {
        path: src.clone(),
        line: source.line(),
        source,
    })?;

    let dataset = normalize_rows(data, text_name)?;
    let dst = dir.join(TRAIN_JSON);
    write_json_lines(&dataset, &dst)?;
    info!(
        "Converted {} ({} rows) into {}",
        src.display(),
        dataset.len(),
        dst.display()
    );
    Ok(dst)
}

/// Flatten a JSON array of row objects into a columnar [`Dataset`].
///
/// Per field: object values become the list of their values; a text field
/// (named `text_name`, with or without one leading `_`) holding a list is
/// joined with newlines; one leading `_` is dropped from the name.
pub fn normalize_rows(data: Value, text_name: &str) -> Result<Dataset, DatasetError> {
    let items = match data {
        Value::Array(items) => items,
        other => {
            return Err(DatasetError::Malformed(format!(
                "expected a JSON array of rows, found {}",
                kind(&other)
            )));
        }
    };

    let mut columns: Vec<(String, Vec<Value>)> = Vec::new();
    for (i, item) in items.into_iter().enumerate() {
        let fields = match item {
            Value::Object(fields) => fields,
            other => {
                return Err(DatasetError::Malformed(format!(
                    "row {i}: expected an object, found {}",
                    kind(&other)
                )));
            }
        };

        for (key, value) in fields {
            let value = match value {
                Value::Object(map) => Value::Array(map.into_iter().map(|(_, v)| v).collect()),
                other => other,
            };

            let is_text = key == text_name || key.strip_prefix('_') == Some(text_name);
            let value = match value {
                Value::Array(parts) if is_text => Value::String(join_text(parts, i, &key)?),
                other => other,
            };

            let name = key.strip_prefix('_').unwrap_or(&key);
            match columns.iter_mut().find(|(n, _)| n == name) {
                Some((_, values)) => values.push(value),
                None => columns.push((name.to_string(), vec![value])),
            }
        }
    }

    Dataset::from_columns(columns)
}

fn join_text(parts: Vec<Value>, row: usize, key: &str) -> Result<String, DatasetError> {
    let pieces = parts
        .into_iter()
        .map(|p| match p {
            Value::String(s) => Ok(s),
            other => Err(DatasetError::Malformed(format!(
                "row {row}: text field `{key}` contains a {} where a string was expected",
                kind(&other)
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(pieces.join(TEXT_JOIN_SEPARATOR))
}
