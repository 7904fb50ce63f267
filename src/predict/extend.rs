//! Greedy consensus extension of seed kmers into full-length candidates.

use ahash::AHashMap;
use rayon::prelude::*;

use super::seeds::Seed;
use super::PredictParams;
use crate::kmer::FrequencyTable;
use crate::types::{PrimerCandidate, ReadEnd, SeqRead};

/// True when `candidate` sits anchored at the chosen end of `seq`.
fn anchored_at(seq: &str, candidate: &str, end: ReadEnd) -> bool {
    match end {
        ReadEnd::FivePrime => seq.starts_with(candidate),
        ReadEnd::ThreePrime => seq.ends_with(candidate),
    }
}

/// The read symbol just beyond the candidate boundary: the byte after a
/// prefix candidate, or the byte before a suffix candidate. None when the
/// read is no longer than the candidate itself.
fn boundary_symbol(seq: &str, candidate_len: usize, end: ReadEnd) -> Option<u8> {
    let bytes = seq.as_bytes();
    match end {
        ReadEnd::FivePrime => bytes.get(candidate_len).copied(),
        ReadEnd::ThreePrime => bytes
            .len()
            .checked_sub(candidate_len + 1)
            .map(|i| bytes[i]),
    }
}

/// Extends one seed while the most common boundary symbol keeps consensus.
///
/// The loop carries the candidate and its matching read set explicitly.
/// Extension stops when consensus among the still-matching reads drops
/// below `min_percent`, when the matching set itself falls below
/// `min_percent` of the original eligible denominator, or at the length
/// cap. Symbol ties go to the lexicographically smallest symbol.
fn extend_seed(
    seed: &Seed,
    reads: &[SeqRead],
    table: &FrequencyTable,
    params: &PredictParams,
) -> String {
    let mut candidate = seed.kmer.clone();
    let mut matching: Vec<&SeqRead> = reads
        .iter()
        .filter(|r| anchored_at(&r.seq, &candidate, params.end))
        .collect();

    while candidate.len() < params.max_len && !matching.is_empty() {
        let mut symbol_counts: AHashMap<u8, u32> = AHashMap::new();
        for read in &matching {
            if let Some(symbol) = boundary_symbol(&read.seq, candidate.len(), params.end) {
                *symbol_counts.entry(symbol).or_insert(0) += 1;
            }
        }
        let Some((&best, &count)) = symbol_counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        else {
            break;
        };

        let share = count as f64 / matching.len() as f64 * 100.0;
        if share < params.min_percent {
            break;
        }

        let next: Vec<&SeqRead> = matching
            .iter()
            .copied()
            .filter(|r| boundary_symbol(&r.seq, candidate.len(), params.end) == Some(best))
            .collect();

        // a vanishing sample must not keep extending on its own consensus
        if table.percent(next.len() as u32) < params.min_percent {
            break;
        }

        match params.end {
            ReadEnd::FivePrime => candidate.push(best as char),
            ReadEnd::ThreePrime => candidate.insert(0, best as char),
        }
        matching = next;
    }

    candidate
}

/// Extends every seed, recomputes support for the final sequences, drops
/// candidates shadowed by a longer one, and orders the survivors.
///
/// Seeds are independent once the table exists, so extension runs per-seed
/// in parallel. Support is recomputed against the full read set rather
/// than summed across seeds, so merged candidates never double count.
pub fn extend_seeds(
    table: &FrequencyTable,
    reads: &[SeqRead],
    seeds: &[Seed],
    params: &PredictParams,
) -> Vec<PrimerCandidate> {
    let mut candidates: Vec<PrimerCandidate> = seeds
        .par_iter()
        .map(|seed| {
            let seq = extend_seed(seed, reads, table, params);
            let support = reads
                .iter()
                .filter(|r| anchored_at(&r.seq, &seq, params.end))
                .count() as u32;
            PrimerCandidate {
                percent: table.percent(support),
                seq,
                end: params.end,
                support,
            }
        })
        .collect();

    // a candidate contained in a longer candidate at the same end is noise
    let snapshot = candidates.clone();
    candidates.retain(|c| {
        !snapshot
            .iter()
            .any(|other| c.seq.len() < other.seq.len() && anchored_at(&other.seq, &c.seq, params.end))
    });

    candidates.sort_by(|a, b| {
        b.percent
            .total_cmp(&a.percent)
            .then_with(|| b.seq.len().cmp(&a.seq.len()))
            .then_with(|| a.seq.cmp(&b.seq))
    });
    candidates.dedup_by(|a, b| a.seq == b.seq);
    candidates
}
