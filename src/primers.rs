//src/primers.rs

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::types::{Primer, PrimerSet};

/// Loads a primer set from a file in either format:
/// ```text
/// >name
/// ACGTACGT
/// ```
/// or one bare sequence per line. Unnamed primers are called `primer_<i>`.
/// Blank lines are skipped and duplicate sequences are dropped, keeping the
/// first occurrence so list order stays meaningful for tie-breaking.
pub fn load_primers<P: AsRef<Path>>(filepath: P) -> io::Result<PrimerSet> {
    let file = File::open(filepath)?;
    let reader = BufReader::new(file);

    let mut primers: PrimerSet = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut next_name: Option<String> = None;

    for line_result in reader.lines() {
        let line = line_result?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('>') {
            next_name = Some(header.split(' ').next().unwrap_or(header).to_string());
            continue;
        }
        let seq = line.to_string();
        if !seen.insert(seq.clone()) {
            next_name = None;
            continue;
        }
        let name = next_name
            .take()
            .unwrap_or_else(|| format!("primer_{}", primers.len()));
        primers.push(Primer { name, seq });
    }

    Ok(primers)
}
