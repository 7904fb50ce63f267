//src/kmer.rs

use ahash::AHashMap;
use rayon::prelude::*;

use crate::types::{ReadEnd, SeqRead};

/// Per-kmer occurrence counts keyed by the end-anchored kmer.
pub type KmerCounts = AHashMap<String, u32>;

/// End-anchored kmer statistics over one pass of the reads.
///
/// `eligible` counts only reads long enough to contribute a kmer and is the
/// denominator for every support percentage downstream. Each eligible read
/// contributes exactly one kmer, so the counts sum to `eligible`.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    pub counts: KmerCounts,
    pub eligible: u32,
    pub k: usize,
    pub end: ReadEnd,
}

impl FrequencyTable {
    pub fn new(k: usize, end: ReadEnd) -> Self {
        Self {
            counts: KmerCounts::new(),
            eligible: 0,
            k,
            end,
        }
    }

    /// Folds `other` into `self`, summing per-kmer counts and denominators.
    /// Associative and commutative, so partial tables built on worker
    /// threads can be merged in any order.
    pub fn merge(mut self, other: FrequencyTable) -> FrequencyTable {
        self.counts.reserve(other.counts.len());
        for (kmer, count) in other.counts {
            *self.counts.entry(kmer).or_insert(0) += count;
        }
        self.eligible += other.eligible;
        self
    }

    /// `count` as a percentage of the eligible-read denominator.
    pub fn percent(&self, count: u32) -> f64 {
        if self.eligible == 0 {
            0.0
        } else {
            count as f64 / self.eligible as f64 * 100.0
        }
    }
}

/// The kmer window anchored at `end`, or None when the read is too short.
pub fn end_kmer(seq: &str, k: usize, end: ReadEnd) -> Option<&str> {
    if seq.len() < k {
        return None;
    }
    match end {
        ReadEnd::FivePrime => seq.get(..k),
        ReadEnd::ThreePrime => seq.get(seq.len() - k..),
    }
}

/// Counts the end-anchored kmer of every eligible read.
///
/// Reads shorter than `k` contribute nothing, to the counts or the
/// denominator. Ambiguity symbols are counted literally, so a kmer
/// containing N is a distinct key. Each worker accumulates into its own
/// table and the partial tables are merged once at the end, keeping the
/// hot path free of shared state.
pub fn count_end_kmers(reads: &[SeqRead], k: usize, end: ReadEnd) -> FrequencyTable {
    reads
        .par_iter()
        .fold(
            || FrequencyTable::new(k, end),
            |mut table, read| {
                if let Some(kmer) = end_kmer(&read.seq, k, end) {
                    *table.counts.entry(kmer.to_string()).or_insert(0) += 1;
                    table.eligible += 1;
                }
                table
            },
        )
        .reduce(|| FrequencyTable::new(k, end), FrequencyTable::merge)
}
