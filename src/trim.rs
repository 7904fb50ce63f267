//src/trim.rs

use rayon::prelude::*;

use crate::error::Error;
use crate::types::{Primer, PrimerHit, ReadEnd, SeqRead, TrimmedRead};

/// Shortest homopolymer run removed from the 3' end by poly-tail trimming.
const POLY_MIN_RUN: usize = 5;

/// Knobs for a trimming run.
#[derive(Debug, Clone, Copy)]
pub struct TrimOptions {
    /// Mismatches tolerated in an anchored primer match.
    pub max_mismatches: u32,
    /// Also remove a trailing homopolymer run after primer trimming.
    pub trim_poly: bool,
}

impl Default for TrimOptions {
    fn default() -> Self {
        Self {
            max_mismatches: 2,
            trim_poly: false,
        }
    }
}

/// Hamming distance over equal-length byte strings.
fn hamming(a: &[u8], b: &[u8]) -> u32 {
    a.iter().zip(b).filter(|(x, y)| x != y).count() as u32
}

/// The best hit among `primers` anchored at one end of `seq`.
///
/// Fewest mismatches wins; ties go to the longer primer, then to the
/// earlier entry in the primer list. Primers longer than the read cannot
/// match and are skipped.
fn best_hit(seq: &str, primers: &[Primer], end: ReadEnd, max_mismatches: u32) -> Option<PrimerHit> {
    let bytes = seq.as_bytes();
    let mut best: Option<PrimerHit> = None;

    for (primer_index, primer) in primers.iter().enumerate() {
        let plen = primer.seq.len();
        if plen == 0 || plen > bytes.len() {
            continue;
        }
        let (start, window) = match end {
            ReadEnd::FivePrime => (0, &bytes[..plen]),
            ReadEnd::ThreePrime => (bytes.len() - plen, &bytes[bytes.len() - plen..]),
        };
        let mismatches = hamming(primer.seq.as_bytes(), window);
        if mismatches > max_mismatches {
            continue;
        }
        let better = match &best {
            None => true,
            Some(current) => {
                mismatches < current.mismatches
                    || (mismatches == current.mismatches && plen > current.length)
            }
        };
        if better {
            best = Some(PrimerHit {
                primer_index,
                primer_name: primer.name.clone(),
                start,
                length: plen,
                mismatches,
            });
        }
    }

    best
}

/// Index where a trailing homopolymer run starts, if the run is at least
/// POLY_MIN_RUN long; otherwise the full length.
fn poly_tail_start(seq: &str) -> usize {
    let bytes = seq.as_bytes();
    let Some(&last) = bytes.last() else {
        return 0;
    };
    let run_start = bytes
        .iter()
        .rposition(|&b| b != last)
        .map(|i| i + 1)
        .unwrap_or(0);
    if bytes.len() - run_start >= POLY_MIN_RUN {
        run_start
    } else {
        bytes.len()
    }
}

/// Trims the best-matching left and right primers off one read.
///
/// The two sides are independent; the right side operates on the
/// left-trimmed read. A side with no qualifying match is left untouched.
/// Qualities, when present, are trimmed in lockstep with the sequence.
pub fn trim_read(
    read: &SeqRead,
    left: &[Primer],
    right: &[Primer],
    options: &TrimOptions,
) -> TrimmedRead {
    let original_len = read.seq.len();
    let has_quals = read.is_fastq();

    let mut seq = read.seq.clone();
    let mut quals = read.quals.clone();

    let left_hit = best_hit(&seq, left, ReadEnd::FivePrime, options.max_mismatches);
    if let Some(hit) = &left_hit {
        seq.drain(..hit.length);
        if has_quals {
            quals.drain(..hit.length);
        }
    }
    let left_offset = left_hit.as_ref().map(|h| h.length).unwrap_or(0);

    let mut right_hit = best_hit(&seq, right, ReadEnd::ThreePrime, options.max_mismatches);
    if let Some(hit) = &mut right_hit {
        seq.truncate(seq.len() - hit.length);
        if has_quals {
            quals.truncate(seq.len());
        }
        // report the span against the untrimmed read
        hit.start += left_offset;
    }

    if options.trim_poly {
        let cut = poly_tail_start(&seq);
        seq.truncate(cut);
        if has_quals {
            quals.truncate(cut);
        }
    }

    TrimmedRead {
        read_id: read.id.clone(),
        original_len,
        left: left_hit,
        right: right_hit,
        read: SeqRead {
            id: read.id.clone(),
            header_line: read.header_line.clone(),
            seq,
            quals,
        },
    }
}

fn require_primers(left: &[Primer], right: &[Primer]) -> Result<(), Error> {
    if left.is_empty() && right.is_empty() {
        return Err(Error::InvalidParameter(
            "either left or right primers must be specified".to_string(),
        ));
    }
    Ok(())
}

/// Validates the primer sets and trims every read, lazily.
pub fn trim_reads<'a>(
    reads: &'a [SeqRead],
    left: &'a [Primer],
    right: &'a [Primer],
    options: TrimOptions,
) -> Result<impl Iterator<Item = TrimmedRead> + 'a, Error> {
    require_primers(left, right)?;
    Ok(reads
        .iter()
        .map(move |read| trim_read(read, left, right, &options)))
}

/// Parallel variant of [`trim_reads`]; results come back in input order.
///
/// Reads never influence each other, so the only shared state is
/// read-only access to the primer sets.
pub fn trim_reads_parallel(
    reads: &[SeqRead],
    left: &[Primer],
    right: &[Primer],
    options: TrimOptions,
) -> Result<Vec<TrimmedRead>, Error> {
    require_primers(left, right)?;
    Ok(reads
        .par_iter()
        .map(|read| trim_read(read, left, right, &options))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(seq: &str) -> SeqRead {
        SeqRead {
            id: format!("read_{seq}"),
            header_line: format!("read_{seq}"),
            seq: seq.to_string(),
            quals: "I".repeat(seq.len()),
        }
    }

    fn primer(name: &str, seq: &str) -> Primer {
        Primer {
            name: name.to_string(),
            seq: seq.to_string(),
        }
    }

    fn exact() -> TrimOptions {
        TrimOptions {
            max_mismatches: 0,
            trim_poly: false,
        }
    }

    #[test]
    fn exact_left_trim() {
        let left = vec![primer("p", "ACGT")];
        for (input, expected) in [
            ("ACGTAAGG", "AAGG"),
            ("ACGTCCGG", "CCGG"),
            ("ACGTTTGG", "TTGG"),
        ] {
            let result = trim_read(&read(input), &left, &[], &exact());
            assert_eq!(result.read.seq, expected);
            assert_eq!(result.read.quals.len(), expected.len());
            let hit = result.left.unwrap();
            assert_eq!((hit.start, hit.length, hit.mismatches), (0, 4, 0));
            assert!(result.right.is_none());
        }
    }

    #[test]
    fn exact_right_trim() {
        let right = vec![primer("p", "GGCC")];
        let result = trim_read(&read("AATTGGCC"), &[], &right, &exact());
        assert_eq!(result.read.seq, "AATT");
        let hit = result.right.unwrap();
        assert_eq!((hit.start, hit.length), (4, 4));
    }

    #[test]
    fn one_mismatch_within_budget_still_trims() {
        let left = vec![primer("p", "ACGT")];
        let options = TrimOptions {
            max_mismatches: 1,
            trim_poly: false,
        };
        let result = trim_read(&read("AGGTAAGG"), &left, &[], &options);
        assert_eq!(result.read.seq, "AAGG");
        assert_eq!(result.left.unwrap().mismatches, 1);
    }

    #[test]
    fn reads_without_a_match_pass_through_unchanged() {
        let left = vec![primer("p", "ACGT")];
        let original = read("TTTTTTGG");
        let result = trim_read(&original, &left, &[], &exact());
        assert_eq!(result.read.seq, original.seq);
        assert_eq!(result.read.quals, original.quals);
        assert!(result.left.is_none());
        assert!(result.right.is_none());
    }

    #[test]
    fn primers_longer_than_the_read_are_unmatchable() {
        let left = vec![primer("p", "ACGTACGTACGT")];
        let result = trim_read(&read("ACGT"), &left, &[], &exact());
        assert_eq!(result.read.seq, "ACGT");
        assert!(result.left.is_none());
    }

    #[test]
    fn fewest_mismatches_beats_list_order() {
        let left = vec![primer("first", "AGGT"), primer("second", "ACGT")];
        let options = TrimOptions {
            max_mismatches: 2,
            trim_poly: false,
        };
        let result = trim_read(&read("ACGTAAGG"), &left, &[], &options);
        assert_eq!(result.left.unwrap().primer_name, "second");
    }

    #[test]
    fn equal_mismatches_prefer_the_longer_primer() {
        let left = vec![primer("short", "ACGT"), primer("long", "ACGTAA")];
        let result = trim_read(&read("ACGTAAGG"), &left, &[], &exact());
        let hit = result.left.unwrap();
        assert_eq!(hit.primer_name, "long");
        assert_eq!(result.read.seq, "GG");
    }

    #[test]
    fn equal_mismatches_and_length_prefer_the_earlier_primer() {
        let left = vec![primer("first", "ACGA"), primer("second", "ACGG")];
        let options = TrimOptions {
            max_mismatches: 1,
            trim_poly: false,
        };
        let result = trim_read(&read("ACGTAAGG"), &left, &[], &options);
        assert_eq!(result.left.unwrap().primer_name, "first");
    }

    #[test]
    fn both_sides_trim_and_spans_use_original_coordinates() {
        let left = vec![primer("l", "ACGT")];
        let right = vec![primer("r", "GGCC")];
        let result = trim_read(&read("ACGTAATTGGCC"), &left, &right, &exact());
        assert_eq!(result.read.seq, "AATT");
        assert_eq!(result.original_len, 12);
        let right_hit = result.right.unwrap();
        assert_eq!((right_hit.start, right_hit.length), (8, 4));
    }

    #[test]
    fn poly_tail_runs_of_five_or_more_are_removed() {
        let options = TrimOptions {
            max_mismatches: 0,
            trim_poly: true,
        };
        let left = vec![primer("p", "ACGT")];
        let result = trim_read(&read("ACGTTTGGAAAAA"), &left, &[], &options);
        assert_eq!(result.read.seq, "TTGG");

        // a run of four stays
        let result = trim_read(&read("ACGTTTGGAAAA"), &left, &[], &options);
        assert_eq!(result.read.seq, "TTGGAAAA");
    }

    #[test]
    fn empty_primer_sets_are_rejected_up_front() {
        let reads = vec![read("ACGTAAGG")];
        assert!(matches!(
            trim_reads_parallel(&reads, &[], &[], TrimOptions::default()),
            Err(Error::InvalidParameter(_))
        ));
        assert!(trim_reads(&reads, &[], &[], TrimOptions::default()).is_err());
    }

    #[test]
    fn parallel_and_serial_trimming_agree() {
        let reads: Vec<SeqRead> = ["ACGTAAGG", "ACGTCCGG", "TTTTTTGG", "ACGT"]
            .into_iter()
            .map(read)
            .collect();
        let left = vec![primer("p", "ACGT")];
        let serial: Vec<TrimmedRead> = trim_reads(&reads, &left, &[], TrimOptions::default())
            .unwrap()
            .collect();
        let parallel = trim_reads_parallel(&reads, &left, &[], TrimOptions::default()).unwrap();
        assert_eq!(serial.len(), parallel.len());
        for (s, p) in serial.iter().zip(&parallel) {
            assert_eq!(s.read, p.read);
            assert_eq!(s.left, p.left);
            assert_eq!(s.right, p.right);
        }
    }
}
