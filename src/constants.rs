// src/constants.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
// Centralized constants for textds to avoid hardcoded values throughout the codebase

/// Default share of rows assigned to the train partition
pub const DEFAULT_TRAIN_SIZE_SPLIT: f64 = 0.8;

/// Default seed for every shuffle in the pipeline
pub const DEFAULT_SEED: u64 = 42;

/// Whether an `id` column is added when the source has none
pub const DEFAULT_ADD_ID_COLUMN: bool = true;

/// Name of the identifier column
pub const ID_COLUMN: &str = "id";

// ============================================================================
// On-disk layout under `<path>/<dataset_name>/`
// ============================================================================

/// Preferred source: comma-separated with a header row
pub const TRAIN_CSV: &str = "train.csv";

/// Newline-delimited JSON rows; written when derived from `dataset.json`
pub const TRAIN_JSON: &str = "train.json";

/// Raw JSON array of (possibly nested) row objects
pub const RAW_DATASET_JSON: &str = "dataset.json";

/// Separator used when a list-valued text field is joined into one string
pub const TEXT_JOIN_SEPARATOR: &str = "\n";

/// File-name prefix for cached token lengths inside the cache directory
pub const TOKEN_LENGTH_CACHE_PREFIX: &str = "token_lengths";

/// Slack applied before flooring `fraction * rows`, so 0.8 * 10 lands on 8
pub const SPLIT_EPSILON: f64 = 1e-9;
