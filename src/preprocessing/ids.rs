// src/preprocessing/ids.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! Row identifiers shared across partitions.
//!
//! Ids are assigned after the train/test split and before the dev split, so
//! dev rows keep the ids they had in train.

use serde_json::Value;

use crate::constants::ID_COLUMN;
use crate::data_loader::dataset::{Dataset, DatasetError};

/// Append an `id` column to each dataset, numbering rows consecutively
/// across all of them so no two rows share an id.
pub fn add_id_column_to_datasets(datasets: &mut [&mut Dataset]) -> Result<(), DatasetError> {
    let mut next: u64 = 0;
    for ds in datasets.iter_mut() {
        let n = ds.len() as u64;
        let ids: Vec<Value> = (next..next + n).map(Value::from).collect();
        ds.add_column(ID_COLUMN, ids)?;
        next += n;
    }
    Ok(())
}
