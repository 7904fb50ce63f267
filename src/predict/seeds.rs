//! Seed selection: end kmers over-represented across the read set.

use crate::kmer::FrequencyTable;

/// A seed kmer with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    pub kmer: String,
    pub count: u32,
}

/// Every kmer whose support meets `min_percent`, most abundant first.
/// Ties break lexicographically so the order is stable across runs.
pub fn select_seeds(table: &FrequencyTable, min_percent: f64) -> Vec<Seed> {
    let mut seeds: Vec<Seed> = table
        .counts
        .iter()
        .filter(|(_, &count)| table.percent(count) >= min_percent)
        .map(|(kmer, &count)| Seed {
            kmer: kmer.clone(),
            count,
        })
        .collect();
    seeds.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.kmer.cmp(&b.kmer)));
    seeds
}
