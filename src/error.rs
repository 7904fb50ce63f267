//src/error.rs

use thiserror::Error;

/// Errors surfaced by the library API.
///
/// Parameter problems are raised at the API boundary before any reads are
/// processed; per-read anomalies (short reads, reads with no primer match)
/// are ordinary results, not errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("could not read input: {0}")]
    Source(#[from] std::io::Error),
}
