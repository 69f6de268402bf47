// src/preprocessing/subset.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
// Seeded, label-stratified down-sampling of the train partition.

use serde_json::Value;
use tracing::info;

use crate::config::SplitSize;
use crate::data_loader::dataset::{Dataset, DatasetError};
use crate::data_loader::sampler::ShuffleSampler;

/// Number of rows a subset request keeps out of `total`.
pub fn subset_rows(size: SplitSize, total: usize) -> Result<usize, DatasetError> {
    let n = match size {
        SplitSize::Count(n) => n.min(total),
        SplitSize::Fraction(f) if f > 0.0 && f <= 1.0 => (f * total as f64).round() as usize,
        SplitSize::Fraction(f) => {
            return Err(DatasetError::Split(format!(
                "subset fraction must be in (0, 1], got {f}"
            )));
        }
    };
    if n == 0 && total > 0 {
        return Err(DatasetError::Split(format!(
            "subset {size} of {total} rows would be empty"
        )));
    }
    Ok(n)
}

/// Per-group quotas summing to `target`, proportional to `sizes`
/// (largest remainder; ties go to the earlier group).
fn apportion(sizes: &[usize], target: usize) -> Vec<usize> {
    let total: usize = sizes.iter().sum();
    if total == 0 {
        return vec![0; sizes.len()];
    }
    let exact: Vec<f64> = sizes
        .iter()
        .map(|&s| target as f64 * s as f64 / total as f64)
        .collect();
    let mut quotas: Vec<usize> = exact.iter().map(|q| q.floor() as usize).collect();

    let mut order: Vec<usize> = (0..sizes.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = exact[a] - quotas[a] as f64;
        let rb = exact[b] - quotas[b] as f64;
        rb.total_cmp(&ra).then(a.cmp(&b))
    });
    let mut left = target.saturating_sub(quotas.iter().sum());
    for g in order {
        if left == 0 {
            break;
        }
        if quotas[g] < sizes[g] {
            quotas[g] += 1;
            left -= 1;
        }
    }
    quotas
}

/// Keep a seeded, label-stratified subset of `dataset`.
///
/// Each label keeps a share proportional to its frequency. Rows are picked
/// in shuffled order and returned in their original relative order.
pub fn use_train_subset(
    dataset: Dataset,
    size: SplitSize,
    seed: u64,
    label_name: &str,
) -> Result<Dataset, DatasetError> {
    let total = dataset.len();
    let target = subset_rows(size, total)?;
    if target >= total {
        return Ok(dataset);
    }

    // group by label, first-seen order
    let mut labels: Vec<&Value> = Vec::new();
    let mut group_of: Vec<usize> = Vec::with_capacity(total);
    for label in dataset.column(label_name)? {
        let g = match labels.iter().position(|l| *l == label) {
            Some(g) => g,
            None => {
                labels.push(label);
                labels.len() - 1
            }
        };
        group_of.push(g);
    }

    let mut sizes = vec![0usize; labels.len()];
    for &g in &group_of {
        sizes[g] += 1;
    }
    let mut quotas = apportion(&sizes, target);

    let mut keep: Vec<usize> = ShuffleSampler::new(total, seed)
        .filter(|&i| {
            let q = &mut quotas[group_of[i]];
            if *q > 0 {
                *q -= 1;
                true
            } else {
                false
            }
        })
        .collect();
    keep.sort_unstable();

    info!(
        "Using train subset of {} rows out of {} ({} labels)",
        keep.len(),
        total,
        labels.len()
    );
    dataset.select(&keep)
}
