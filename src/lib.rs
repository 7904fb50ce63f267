// src/lib.rs
pub mod error;
pub mod fastq;
pub mod kmer;
pub mod predict;
pub mod primers;
pub mod trim;
pub mod types;

use std::fmt::Write as FmtWrite;
use std::path::Path;

use crate::error::Error;
use crate::fastq::read_records;
use crate::kmer::{count_end_kmers, FrequencyTable};
use crate::predict::{build_candidates, PredictParams};
use crate::primers::load_primers;
use crate::trim::{trim_reads_parallel, TrimOptions};
use crate::types::{PrimerCandidate, PrimerSet, TrimmedRead};

/// A struct to hold prediction results with minimal duplication.
/// Only structured data is stored; text renderings are generated on demand.
pub struct PredictionResults {
    /// Candidates ordered by support percentage, length, then sequence.
    pub candidates: Vec<PrimerCandidate>,

    /// The end-kmer table the candidates were seeded from.
    pub table: FrequencyTable,

    /// Total records in the input, eligible or not.
    pub total_reads: usize,
}

impl PredictionResults {
    /// Candidates as fasta, one `>primer_<i>` record each.
    pub fn get_fasta_text(&self) -> String {
        let mut output = String::new();
        for (i, candidate) in self.candidates.iter().enumerate() {
            writeln!(output, ">primer_{}\n{}", i, candidate.seq).unwrap();
        }
        output
    }

    /// Per-candidate support counts plus a total occurrence line.
    pub fn get_abundance_text(&self) -> String {
        let mut output = String::new();
        output.push_str("Primer\tAbundance\n");
        let mut total = 0u32;
        for candidate in &self.candidates {
            writeln!(output, "{}\t{}", candidate.seq, candidate.support).unwrap();
            total += candidate.support;
        }
        writeln!(
            output,
            "\nTotal primer occurrences: {} in {} eligible sequences ({:.2}%)",
            total,
            self.table.eligible,
            self.table.percent(total)
        )
        .unwrap();
        output
    }

    /// Every counted end kmer, most frequent first.
    pub fn get_kmer_count_text(&self) -> String {
        let mut entries: Vec<(&String, &u32)> = self.table.counts.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        let mut output = String::new();
        for (kmer, count) in entries {
            writeln!(output, "Kmer: {} Count: {}", kmer, count).unwrap();
        }
        output
    }
}

/// Predicts primers in a fasta/fastq file (optionally gzipped).
///
/// Validation happens before the file is opened; an empty file yields an
/// empty candidate list.
pub fn predict_primers<P: AsRef<Path>>(
    reads_path: P,
    params: &PredictParams,
) -> Result<PredictionResults, Error> {
    params.validate()?;

    let reads = read_records(reads_path)?;
    log::info!("loaded {} reads", reads.len());

    let table = count_end_kmers(&reads, params.k, params.end);
    log::info!(
        "{} eligible reads, {} distinct end kmers",
        table.eligible,
        table.counts.len()
    );

    let candidates = build_candidates(&table, &reads, params);
    log::info!("{} primer candidates", candidates.len());

    Ok(PredictionResults {
        candidates,
        table,
        total_reads: reads.len(),
    })
}

/// A struct to hold per-read trimming outcomes for one input file.
pub struct TrimResults {
    /// One entry per input read, in input order.
    pub results: Vec<TrimmedRead>,

    /// The primer sets the run matched against.
    pub left_primers: PrimerSet,
    pub right_primers: PrimerSet,
}

impl TrimResults {
    /// Trimmed records in their native format: fastq where qualities are
    /// present, fasta otherwise.
    pub fn get_trimmed_text(&self) -> String {
        let mut output = String::new();
        for result in &self.results {
            let read = &result.read;
            if read.is_fastq() {
                writeln!(output, "@{}\n{}\n+\n{}", read.header_line, read.seq, read.quals)
                    .unwrap();
            } else {
                writeln!(output, ">{}\n{}", read.header_line, read.seq).unwrap();
            }
        }
        output
    }

    /// Count of reads that had at least one primer removed.
    pub fn trimmed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.left.is_some() || r.right.is_some())
            .count()
    }
}

/// Trims primers from a fastq/fasta file given primer files for either end.
///
/// At least one primer file is required; that rule is enforced here, before
/// any reads are loaded, so every caller gets the same guarantee.
pub fn trim_primers<P: AsRef<Path>>(
    reads_path: P,
    left_path: Option<&Path>,
    right_path: Option<&Path>,
    options: TrimOptions,
) -> Result<TrimResults, Error> {
    let left = match left_path {
        Some(path) => load_primers(path)?,
        None => Vec::new(),
    };
    let right = match right_path {
        Some(path) => load_primers(path)?,
        None => Vec::new(),
    };
    log::info!(
        "{} left primers, {} right primers",
        left.len(),
        right.len()
    );

    if left.is_empty() && right.is_empty() {
        return Err(Error::InvalidParameter(
            "either left or right primers must be specified".to_string(),
        ));
    }

    let reads = read_records(reads_path)?;
    log::info!("loaded {} reads", reads.len());

    let results = trim_reads_parallel(&reads, &left, &right, options)?;
    Ok(TrimResults {
        results,
        left_primers: left,
        right_primers: right,
    })
}
