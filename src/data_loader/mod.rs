// src/data_loader/mod.rs

//! In-memory table plus the seeded split machinery.
/// expose the `dataset` module (file dataset.rs)
pub mod dataset;

/// expose the `sampler` module (file sampler.rs)
pub mod sampler;

/// expose the `split` module (file split.rs)
pub mod split;

// Re‐export the key types at this level:
pub use dataset::{Dataset, DatasetError, Row};
pub use sampler::ShuffleSampler;
pub use split::{train_test_split, SplitPair, TrainSize};
