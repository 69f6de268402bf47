// src/config.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! Typed configuration for the dataset loader.
//!
//! Everything the pipeline reads is declared here with its default, and
//! [`LoadConfig::validate`] rejects bad combinations before any file is
//! touched.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{
    DEFAULT_ADD_ID_COLUMN, DEFAULT_SEED, DEFAULT_TRAIN_SIZE_SPLIT,
};

/// Configuration problems, reported before the pipeline runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("missing required config field `{0}`")]
    MissingField(&'static str),

    #[error("`{field}` must be a fraction in (0, 1), got {value}")]
    FractionOutOfRange { field: &'static str, value: f64 },

    #[error("`{field}` must be a positive count, got {value}")]
    ZeroCount { field: &'static str, value: usize },

    #[error("`filter_quantiles` must satisfy 0 <= low < high <= 1, got [{low}, {high}]")]
    InvalidQuantiles { low: f64, high: f64 },

    #[error("`filter_quantiles` is set but `tokenizer_name` is empty or missing")]
    MissingTokenizer,

    #[error("failed to read config `{}`: {message}", path.display())]
    Unreadable { path: PathBuf, message: String },
}

/// A split request: either an absolute row count or a share of the rows.
///
/// JSON integers deserialize as [`SplitSize::Count`], JSON floats as
/// [`SplitSize::Fraction`].
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(untagged)]
pub enum SplitSize {
    Count(usize),
    Fraction(f64),
}

impl SplitSize {
    fn check(self, field: &'static str) -> Result<(), ConfigError> {
        match self {
            SplitSize::Count(0) => Err(ConfigError::ZeroCount { field, value: 0 }),
            SplitSize::Count(_) => Ok(()),
            SplitSize::Fraction(f) if f > 0.0 && f < 1.0 => Ok(()),
            SplitSize::Fraction(f) => Err(ConfigError::FractionOutOfRange { field, value: f }),
        }
    }
}

impl fmt::Display for SplitSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitSize::Count(n) => write!(f, "{n} rows"),
            SplitSize::Fraction(x) => write!(f, "{x}"),
        }
    }
}

/// Inclusive quantile window, written in config as `[low, high]`.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct QuantileRange(pub f64, pub f64);

impl QuantileRange {
    pub fn low(&self) -> f64 {
        self.0
    }

    pub fn high(&self) -> f64 {
        self.1
    }

    fn check(self) -> Result<(), ConfigError> {
        let (low, high) = (self.0, self.1);
        if (0.0..=1.0).contains(&low) && (0.0..=1.0).contains(&high) && low < high {
            Ok(())
        } else {
            Err(ConfigError::InvalidQuantiles { low, high })
        }
    }
}

/// Runtime parameters for [`crate::loader::load_from_json_or_csv`].
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LoadConfig {
    pub path: PathBuf,
    pub dataset_name: String,
    pub text_name: String,
    pub label_name: String,

    /// Integer: rows held out for test. Float: share held out for test.
    #[serde(default)]
    pub test_size_split: Option<SplitSize>,
    /// Only consulted when `test_size_split` is unset.
    #[serde(default = "default_train_size_split")]
    pub train_size_split: f64,
    /// Integer N: keep N training rows, the rest become dev.
    /// Float: share of the training rows held out for dev.
    #[serde(default)]
    pub dev_size_split: Option<SplitSize>,

    #[serde(default)]
    pub filter_quantiles: Option<QuantileRange>,
    #[serde(default)]
    pub use_subset: Option<SplitSize>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_add_id_column")]
    pub add_id_column: bool,
    #[serde(default)]
    pub tokenizer_name: Option<String>,
}

fn default_train_size_split() -> f64 {
    DEFAULT_TRAIN_SIZE_SPLIT
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_add_id_column() -> bool {
    DEFAULT_ADD_ID_COLUMN
}

impl LoadConfig {
    /// Create a config with the four required fields and every optional one defaulted.
    pub fn new(
        path: impl Into<PathBuf>,
        dataset_name: impl Into<String>,
        text_name: impl Into<String>,
        label_name: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            dataset_name: dataset_name.into(),
            text_name: text_name.into(),
            label_name: label_name.into(),
            test_size_split: None,
            train_size_split: DEFAULT_TRAIN_SIZE_SPLIT,
            dev_size_split: None,
            filter_quantiles: None,
            use_subset: None,
            seed: DEFAULT_SEED,
            add_id_column: DEFAULT_ADD_ID_COLUMN,
            tokenizer_name: None,
        }
    }

    /// Parse a JSON config file and validate it.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let unreadable = |message: String| ConfigError::Unreadable {
            path: path.to_path_buf(),
            message,
        };
        let raw = std::fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
        let cfg: LoadConfig = serde_json::from_str(&raw).map_err(|e| unreadable(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_test_size_split(mut self, size: SplitSize) -> Self {
        self.test_size_split = Some(size);
        self
    }

    pub fn with_dev_size_split(mut self, size: SplitSize) -> Self {
        self.dev_size_split = Some(size);
        self
    }

    pub fn with_filter_quantiles(mut self, low: f64, high: f64, tokenizer: impl Into<String>) -> Self {
        self.filter_quantiles = Some(QuantileRange(low, high));
        self.tokenizer_name = Some(tokenizer.into());
        self
    }

    pub fn with_subset(mut self, size: SplitSize) -> Self {
        self.use_subset = Some(size);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_add_id_column(mut self, add: bool) -> Self {
        self.add_id_column = add;
        self
    }

    /// Directory holding the dataset files.
    pub fn dataset_dir(&self) -> PathBuf {
        self.path.join(&self.dataset_name)
    }

    /// Check every field that can be checked without looking at the data.
    ///
    /// Counts are only checked for being non-zero here; whether they fit the
    /// row count is decided at split time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dataset_name.is_empty() {
            return Err(ConfigError::MissingField("dataset_name"));
        }
        if self.text_name.is_empty() {
            return Err(ConfigError::MissingField("text_name"));
        }
        if self.label_name.is_empty() {
            return Err(ConfigError::MissingField("label_name"));
        }

        match self.test_size_split {
            Some(size) => size.check("test_size_split")?,
            None => SplitSize::Fraction(self.train_size_split).check("train_size_split")?,
        }
        if let Some(size) = self.dev_size_split {
            size.check("dev_size_split")?;
        }
        if let Some(size) = self.use_subset {
            match size {
                // a subset may keep the whole train set
                SplitSize::Fraction(f) if f == 1.0 => {}
                other => other.check("use_subset")?,
            }
        }
        if let Some(range) = self.filter_quantiles {
            range.check()?;
            // the tokenizer itself is loaded when the filter runs
            match self.tokenizer_name.as_deref() {
                Some(name) if !name.trim().is_empty() => {}
                _ => return Err(ConfigError::MissingTokenizer),
            }
        }
        Ok(())
    }
}
