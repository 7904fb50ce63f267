use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::types::SeqRead;

/// Minimal fasta/fastq reader that also supports .gz input.
///
/// Compression is detected from the gzip magic bytes rather than the file
/// extension; the record format is taken from the first byte of each header
/// line ('@' fastq, '>' fasta).
pub fn read_records<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<SeqRead>> {
    let mut f = File::open(&path)?;
    let mut magic = [0u8; 2];
    let n = f.read(&mut magic)?;

    let reopen = BufReader::new(File::open(&path)?);
    let reader: Box<dyn BufRead> = if n == 2 && magic == [0x1f, 0x8b] {
        Box::new(BufReader::new(MultiGzDecoder::new(reopen)))
    } else {
        Box::new(reopen)
    };

    read_records_from(reader)
}

/// Reads records from any buffered source. Split out so parsing can be
/// exercised on in-memory buffers.
pub fn read_records_from<R: BufRead>(mut reader: R) -> std::io::Result<Vec<SeqRead>> {
    let mut records = Vec::new();
    let mut line = String::new();
    // holds a fasta header consumed while gathering the previous sequence
    let mut pending: Option<String> = None;

    loop {
        let header_line = match pending.take() {
            Some(h) => h,
            None => {
                line.clear();
                if reader.read_line(&mut line)? == 0 {
                    break;
                }
                let trimmed = line.trim_end();
                if trimmed.is_empty() {
                    continue;
                }
                trimmed.to_string()
            }
        };

        if let Some(header) = header_line.strip_prefix('@') {
            // fastq: header, sequence, plus line, quality
            let header = header.to_string();
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            let seq = line.trim_end().to_string();
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            let quals = line.trim_end().to_string();
            records.push(SeqRead {
                id: record_id(&header),
                header_line: header,
                seq,
                quals,
            });
        } else if let Some(header) = header_line.strip_prefix('>') {
            // fasta: sequence may span several lines, ends at the next header
            let header = header.to_string();
            let mut seq = String::new();
            loop {
                line.clear();
                if reader.read_line(&mut line)? == 0 {
                    break;
                }
                let trimmed = line.trim_end();
                if trimmed.starts_with('>') {
                    pending = Some(trimmed.to_string());
                    break;
                }
                seq.push_str(trimmed);
            }
            records.push(SeqRead {
                id: record_id(&header),
                header_line: header,
                seq,
                quals: String::new(),
            });
        }
        // anything else is a stray line; skip it
    }

    Ok(records)
}

fn record_id(header: &str) -> String {
    header.split(' ').next().unwrap_or(header).to_string()
}
