pub mod extend;
pub mod seeds;

use crate::error::Error;
use crate::kmer::{count_end_kmers, FrequencyTable};
use crate::types::{PrimerCandidate, ReadEnd, SeqRead};

pub const DEFAULT_KMER_LEN: usize = 10;
pub const DEFAULT_MIN_PERCENT: f64 = 1.0;
pub const DEFAULT_MAX_PRIMER_LEN: usize = 40;

/// Tuning for a prediction run.
#[derive(Debug, Clone, Copy)]
pub struct PredictParams {
    /// Seed kmer length.
    pub k: usize,
    /// Minimum percent of eligible reads a kmer or extension must keep.
    pub min_percent: f64,
    /// Which read end to predict at.
    pub end: ReadEnd,
    /// Hard cap on candidate length.
    pub max_len: usize,
}

impl PredictParams {
    pub fn new(k: usize, min_percent: f64, end: ReadEnd) -> Self {
        Self {
            k,
            min_percent,
            end,
            max_len: DEFAULT_MAX_PRIMER_LEN,
        }
    }

    /// Rejects out-of-range parameters before any reads are touched.
    pub fn validate(&self) -> Result<(), Error> {
        if self.k == 0 {
            return Err(Error::InvalidParameter(
                "kmer length must be positive".to_string(),
            ));
        }
        if !(self.min_percent > 0.0 && self.min_percent <= 100.0) {
            return Err(Error::InvalidParameter(format!(
                "minimum percent must be in (0, 100], got {}",
                self.min_percent
            )));
        }
        if self.max_len < self.k {
            return Err(Error::InvalidParameter(format!(
                "maximum primer length {} is shorter than the kmer length {}",
                self.max_len, self.k
            )));
        }
        Ok(())
    }
}

/// Predicts primer candidates anchored at the chosen end of the reads.
///
/// Counts end kmers, selects over-represented seeds, and extends each seed
/// by consensus. Deterministic for a fixed read multiset: the result does
/// not depend on read order.
pub fn predict(reads: &[SeqRead], params: &PredictParams) -> Result<Vec<PrimerCandidate>, Error> {
    params.validate()?;
    let table = count_end_kmers(reads, params.k, params.end);
    Ok(build_candidates(&table, reads, params))
}

/// Builds candidates from an already-counted frequency table.
pub fn build_candidates(
    table: &FrequencyTable,
    reads: &[SeqRead],
    params: &PredictParams,
) -> Vec<PrimerCandidate> {
    let seeds = seeds::select_seeds(table, params.min_percent);
    log::debug!(
        "{} of {} distinct kmers qualify as seeds at >= {}%",
        seeds.len(),
        table.counts.len(),
        params.min_percent
    );
    extend::extend_seeds(table, reads, &seeds, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(seq: &str) -> SeqRead {
        SeqRead {
            id: format!("read_{seq}"),
            header_line: format!("read_{seq}"),
            seq: seq.to_string(),
            quals: String::new(),
        }
    }

    #[test]
    fn shared_prefix_extends_to_the_divergence_point() {
        let reads = vec![read("ACGTACGTAA"), read("ACGTACGTGG"), read("ACGTACGTCC")];
        let params = PredictParams::new(4, 100.0, ReadEnd::FivePrime);
        let candidates = predict(&reads, &params).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].seq, "ACGTACGT");
        assert_eq!(candidates[0].support, 3);
        assert_eq!(candidates[0].percent, 100.0);
    }

    #[test]
    fn shared_suffix_extends_toward_the_start() {
        let reads = vec![read("AATTGCGGCC"), read("CCTTGCGGCC"), read("GGTTGCGGCC")];
        let params = PredictParams::new(4, 100.0, ReadEnd::ThreePrime);
        let candidates = predict(&reads, &params).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].seq, "TTGCGGCC");
        assert_eq!(candidates[0].support, 3);
    }

    #[test]
    fn empty_input_yields_no_candidates() {
        let params = PredictParams::new(4, 100.0, ReadEnd::FivePrime);
        assert!(predict(&[], &params).unwrap().is_empty());
    }

    #[test]
    fn rejects_out_of_range_min_percent() {
        let reads = vec![read("ACGTACGT")];
        for bad in [0.0, -1.0, 150.0] {
            let params = PredictParams::new(4, bad, ReadEnd::FivePrime);
            assert!(matches!(
                predict(&reads, &params),
                Err(Error::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn rejects_zero_kmer_length() {
        let params = PredictParams::new(0, 1.0, ReadEnd::FivePrime);
        assert!(matches!(
            predict(&[], &params),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn repeated_runs_and_read_reordering_agree() {
        let mut reads = vec![
            read("ACGTACGTAA"),
            read("ACGTACGTGG"),
            read("TTTTAAAACC"),
            read("TTTTAAAAGG"),
            read("ACGTACGTCC"),
        ];
        let params = PredictParams::new(4, 20.0, ReadEnd::FivePrime);
        let first = predict(&reads, &params).unwrap();
        let second = predict(&reads, &params).unwrap();
        assert_eq!(first, second);
        reads.reverse();
        let reordered = predict(&reads, &params).unwrap();
        assert_eq!(first, reordered);
    }

    #[test]
    fn raising_the_threshold_never_adds_candidates() {
        let reads = vec![
            read("ACGTACGTAA"),
            read("ACGTACGTGG"),
            read("ACGTACGTCC"),
            read("TTTTAAAACC"),
        ];
        let loose = predict(&reads, &PredictParams::new(4, 25.0, ReadEnd::FivePrime)).unwrap();
        let strict = predict(&reads, &PredictParams::new(4, 75.0, ReadEnd::FivePrime)).unwrap();
        assert!(strict.len() <= loose.len());
        for candidate in &strict {
            assert!(loose.iter().any(|c| c.seq.starts_with(&candidate.seq)
                || candidate.seq.starts_with(&c.seq)));
        }
    }
}
