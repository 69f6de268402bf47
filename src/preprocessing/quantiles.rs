// src/preprocessing/quantiles.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
// Drop rows whose text length falls outside a quantile window of the
// length distribution.

use std::path::Path;
use tracing::info;

use crate::config::QuantileRange;
use crate::data_loader::dataset::{Dataset, DatasetError};
use crate::preprocessing::tokenize::{token_lengths, TokenCounter};

/// `q`-quantile of already sorted values, linearly interpolated between
/// the two nearest ranks.
pub fn quantile(sorted: &[usize], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] as f64 + (sorted[hi] as f64 - sorted[lo] as f64) * frac)
}

/// Keep the rows whose length lies inside `[quantile(low), quantile(high)]`.
pub fn filter_quantiles(
    dataset: Dataset,
    range: QuantileRange,
    cache_dir: Option<&Path>,
    text_name: &str,
    tokenizer_name: &str,
) -> Result<Dataset, DatasetError> {
    let counter = TokenCounter::load(tokenizer_name)?;
    let lengths = token_lengths(&dataset, text_name, &counter, cache_dir)?;

    let mut sorted = lengths.clone();
    sorted.sort_unstable();
    let (Some(lo), Some(hi)) = (quantile(&sorted, range.low()), quantile(&sorted, range.high())) else {
        return Ok(dataset);
    };

    let keep: Vec<usize> = lengths
        .iter()
        .enumerate()
        .filter(|&(_, &len)| (len as f64) >= lo && (len as f64) <= hi)
        .map(|(i, _)| i)
        .collect();

    info!(
        "Quantile filter [{}, {}] on {} lengths kept {} of {} rows (length {:.1}..={:.1})",
        range.low(),
        range.high(),
        counter,
        keep.len(),
        dataset.len(),
        lo,
        hi
    );
    dataset.select(&keep)
}
