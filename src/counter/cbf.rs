//! Counting Bloom filter (component D): a count-min sketch used to gate
//! writes into the main count vector so that hash collisions on
//! high-abundance k-mers don't inflate low-abundance bins.

use super::vector::{CountVector, SaturatingCounter};
use crate::kmer::hash::seeded_hash;

/// `t` parallel banks of size `M/2`. With `t == 0` the filter is disabled
/// and callers should write directly into the main count vector instead.
pub struct CountingBloomFilter<E: SaturatingCounter> {
    banks: Vec<CountVector<E>>,
    bank_size: usize,
}

impl<E: SaturatingCounter> CountingBloomFilter<E> {
    /// Build `t` banks of size `m / 2`.
    pub fn new(t: usize, m: usize) -> Self {
        let bank_size = m / 2;
        CountingBloomFilter {
            banks: (0..t).map(|_| CountVector::new(bank_size)).collect(),
            bank_size,
        }
    }

    pub fn num_banks(&self) -> usize {
        self.banks.len()
    }

    pub fn bank_size(&self) -> usize {
        self.bank_size
    }

    /// Count-min estimate of `h`'s prior frequency (min across banks),
    /// increment every bank, and return `prior + 1` — the value the caller
    /// should write into the main count vector (spec.md §4.D).
    pub fn count(&mut self, h: u64) -> u64 {
        let indices: Vec<usize> = (0..self.banks.len())
            .map(|b| (seeded_hash(h, b as u32) as usize) % self.bank_size)
            .collect();

        let prior = indices
            .iter()
            .zip(self.banks.iter())
            .map(|(&i, bank)| bank.get(i as u64).to_u64())
            .min()
            .unwrap_or(0);

        for (&i, bank) in indices.iter().zip(self.banks.iter_mut()) {
            bank.increment(i as u64);
        }

        prior + 1
    }
}
