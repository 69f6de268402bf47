//! Seeded two-way partitioning of a [`Dataset`].
//!
//! Rows are permuted with [`ShuffleSampler`]; the first `n_train` permuted
//! rows become the train side and the remainder the held-out side.

use tracing::debug;

use crate::constants::SPLIT_EPSILON;
use crate::data_loader::dataset::{Dataset, DatasetError};
use crate::data_loader::sampler::ShuffleSampler;

/// Size of the train side of a split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrainSize {
    /// Exact number of train rows.
    Rows(usize),
    /// Share of all rows, floored.
    Fraction(f64),
}

impl TrainSize {
    /// Number of train rows for a dataset of `total` rows.
    ///
    /// Both sides must end up non-empty.
    pub fn resolve(self, total: usize) -> Result<usize, DatasetError> {
        let n_train = match self {
            TrainSize::Rows(n) => n,
            TrainSize::Fraction(f) => {
                if !(f > 0.0 && f < 1.0) {
                    return Err(DatasetError::Split(format!(
                        "train fraction must be in (0, 1), got {f}"
                    )));
                }
                (f * total as f64 + SPLIT_EPSILON).floor() as usize
            }
        };
        if n_train == 0 || n_train >= total {
            return Err(DatasetError::Split(format!(
                "{self:?} over {total} rows leaves {n_train} train and {} held-out rows",
                total.saturating_sub(n_train)
            )));
        }
        Ok(n_train)
    }
}

/// A train/held-out pair produced by [`train_test_split`].
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPair {
    pub train: Dataset,
    pub test: Dataset,
}

/// Shuffle `dataset` with `seed` and cut it into train and held-out parts.
pub fn train_test_split(
    dataset: &Dataset,
    train_size: TrainSize,
    seed: u64,
) -> Result<SplitPair, DatasetError> {
    let total = dataset.len();
    let n_train = train_size.resolve(total)?;
    let order = ShuffleSampler::new(total, seed).into_indices();
    let (train_idx, test_idx) = order.split_at(n_train);

    debug!(total, n_train, n_test = test_idx.len(), seed, "split dataset");
    Ok(SplitPair {
        train: dataset.select(train_idx)?,
        test: dataset.select(test_idx)?,
    })
}
