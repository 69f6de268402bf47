//! src/data_loader/sampler.rs
//! Deterministic index permutations.
//!
//! `ShuffleSampler` yields `0..len` in a shuffled order fixed by the seed.
//! Every random choice in the pipeline goes through it, so a given input and
//! seed always produce the same partitions.

use rand_chacha::ChaCha20Rng;
use rand_chacha::rand_core::{RngCore, SeedableRng};

/// Yields all indices `0..len` in a deterministic shuffled order.
#[derive(Debug, Clone)]
pub struct ShuffleSampler {
    indices: Vec<usize>,
    pos: usize,
}

impl ShuffleSampler {
    /// Create a shuffled sampler for `len` items, using `seed`.
    pub fn new(len: usize, seed: u64) -> Self {
        let mut indices: Vec<usize> = (0..len).collect();
        shuffle_in_place(&mut indices, seed);
        Self { indices, pos: 0 }
    }

    /// The full permutation, regardless of how much has been consumed.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }
}

impl Iterator for ShuffleSampler {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let i = *self.indices.get(self.pos)?;
        self.pos += 1;
        Some(i)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.indices.len().saturating_sub(self.pos);
        (rest, Some(rest))
    }
}

/// Fisher–Yates shuffle driven by a ChaCha20 stream seeded from `seed`.
pub fn shuffle_in_place<T>(items: &mut [T], seed: u64) {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    for i in (1..items.len()).rev() {
        // generate a u32 and reduce to [0..=i]
        let j = (rng.next_u32() as usize) % (i + 1);
        items.swap(i, j);
    }
}
