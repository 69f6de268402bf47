// src/lib.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
// Crate root — public re-exports for the dataset loader.

pub mod constants;
pub mod config;
pub mod data_formats;
pub mod data_loader;
pub mod preprocessing;
pub mod loader;

// ===== Re-exports at the crate root =====
pub use crate::config::{ConfigError, LoadConfig, QuantileRange, SplitSize};
pub use crate::data_loader::dataset::{Dataset, DatasetError, Row};
pub use crate::data_loader::split::{train_test_split, SplitPair, TrainSize};
pub use crate::loader::{load_from_json_or_csv, DevPartition, Splits};
// Module alias so callers can write `textds::dataset::Row`:
pub use crate::data_loader::dataset;
