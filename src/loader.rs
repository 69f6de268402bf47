// src/loader.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! Load a text dataset from `<path>/<dataset_name>/` and cut it into
//! train / dev / test partitions.
//!
//! Stages, in order:
//!  1. read `train.csv`, else `train.json`, else convert `dataset.json`
//!  2. keep only the text, label and `id` columns
//!  3. seeded train/test split
//!  4. optional quantile filter on train text length
//!  5. optional stratified train subset
//!  6. `id` column on train and test unless one exists
//!  7. optional dev split carved out of train

use std::path::Path;
use tracing::{debug, info};

use crate::config::{ConfigError, LoadConfig, SplitSize};
use crate::constants::{ID_COLUMN, RAW_DATASET_JSON, TRAIN_CSV, TRAIN_JSON};
use crate::data_formats::{convert_list_of_dicts, read_csv, read_json};
use crate::data_loader::dataset::{Dataset, DatasetError};
use crate::data_loader::split::{train_test_split, TrainSize};
use crate::preprocessing::{add_id_column_to_datasets, filter_quantiles, use_train_subset};

/// The dev partition: either held out from train, or the test set itself.
#[derive(Debug, Clone, PartialEq)]
pub enum DevPartition {
    /// No dev split configured; dev reads from the test partition.
    SameAsTest,
    /// Rows held out of train.
    Held(Dataset),
}

/// Result of [`load_from_json_or_csv`].
#[derive(Debug, Clone, PartialEq)]
pub struct Splits {
    pub train: Dataset,
    pub dev: DevPartition,
    pub test: Dataset,
}

impl Splits {
    /// The dev rows; the test partition when no dev split was made.
    pub fn dev(&self) -> &Dataset {
        match &self.dev {
            DevPartition::SameAsTest => &self.test,
            DevPartition::Held(ds) => ds,
        }
    }

    pub fn dev_is_test(&self) -> bool {
        matches!(self.dev, DevPartition::SameAsTest)
    }

    /// `[train, dev, test]` as independent datasets. An aliased dev is a
    /// copy of test, so mutating one never touches the other.
    pub fn into_parts(self) -> [Dataset; 3] {
        let dev = match self.dev {
            DevPartition::SameAsTest => self.test.clone(),
            DevPartition::Held(ds) => ds,
        };
        [self.train, dev, self.test]
    }
}

/// Run the whole pipeline described by `config`.
///
/// `cache_dir` is only used by the quantile filter to cache text lengths.
pub fn load_from_json_or_csv(config: &LoadConfig, cache_dir: Option<&Path>) -> Result<Splits, DatasetError> {
    config.validate()?;
    let text_name = config.text_name.as_str();
    let label_name = config.label_name.as_str();

    let mut dataset = read_source(config)?;
    project_columns(&mut dataset, text_name, label_name);
    debug!(rows = dataset.len(), columns = ?dataset.column_names(), "dataset loaded");

    let train_size = match config.test_size_split {
        Some(SplitSize::Count(n)) => TrainSize::Rows(dataset.len().saturating_sub(n)),
        Some(SplitSize::Fraction(f)) => TrainSize::Fraction(1.0 - f),
        None => TrainSize::Fraction(config.train_size_split),
    };
    let pair = train_test_split(&dataset, train_size, config.seed)?;
    let (mut train, mut test) = (pair.train, pair.test);
    log_dataset_lengths(&train, &test, None);

    if let Some(range) = config.filter_quantiles {
        let tokenizer = config
            .tokenizer_name
            .as_deref()
            .ok_or(ConfigError::MissingTokenizer)?;
        train = filter_quantiles(train, range, cache_dir, text_name, tokenizer)?;
    }

    if let Some(size) = config.use_subset {
        train = use_train_subset(train, size, config.seed, label_name)?;
    }

    if !train.has_column(ID_COLUMN) && config.add_id_column {
        add_id_column_to_datasets(&mut [&mut train, &mut test])?;
    }

    let Some(dev_size) = config.dev_size_split else {
        log_dataset_lengths(&train, &test, None);
        return Ok(Splits { train, dev: DevPartition::SameAsTest, test });
    };

    let train_size = match dev_size {
        // N is the number of rows left in train
        SplitSize::Count(n) => TrainSize::Rows(n),
        SplitSize::Fraction(f) => TrainSize::Fraction(1.0 - f),
    };
    let pair = train_test_split(&train, train_size, config.seed)?;
    let (train, dev) = (pair.train, pair.test);
    log_dataset_lengths(&train, &test, Some(&dev));

    Ok(Splits { train, dev: DevPartition::Held(dev), test })
}

/// Pick the source file, converting `dataset.json` when it is the only one.
fn read_source(config: &LoadConfig) -> Result<Dataset, DatasetError> {
    let dir = config.dataset_dir();

    let csv_path = dir.join(TRAIN_CSV);
    if csv_path.exists() {
        info!("Reading {}", csv_path.display());
        return read_csv(&csv_path);
    }

    let json_path = dir.join(TRAIN_JSON);
    if !json_path.exists() {
        // fails with MissingFile when dataset.json is absent too
        convert_list_of_dicts(&dir, RAW_DATASET_JSON, &config.text_name)?;
    }
    info!("Reading {}", json_path.display());
    read_json(&json_path)
}

/// Drop every column except text, label and `id`.
pub fn project_columns(dataset: &mut Dataset, text_name: &str, label_name: &str) {
    let extra: Vec<String> = dataset
        .column_names()
        .iter()
        .filter(|c| ![text_name, label_name, ID_COLUMN].contains(&c.as_str()))
        .cloned()
        .collect();
    if !extra.is_empty() {
        debug!(?extra, "dropping columns");
    }
    dataset.remove_columns(&extra);
}

pub fn log_dataset_lengths(train: &Dataset, test: &Dataset, dev: Option<&Dataset>) {
    info!("Loaded train size: {}", train.len());
    info!("Loaded test size: {}", test.len());
    match dev {
        None => info!("Dev dataset coincides with test dataset"),
        Some(dev) => info!("Loaded dev size: {}", dev.len()),
    }
}
