// Error taxonomy for the selection pipeline.
//
// Per-record problems (MalformedRecord) are recoverable: the corpus reader
// skips the record and keeps going. Structural problems (InvariantViolation)
// abort the run, since they mean an aggregation stage produced something the
// next stage cannot trust. Configuration problems are raised before any stage
// starts.

use crate::contingency::key::ContingencyKey;

/// Errors raised by the library. The binary wraps these in `anyhow`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An input record is missing a required field or is not parseable.
    #[error("malformed record{}: {reason}", describe_line(.line))]
    MalformedRecord { line: Option<usize>, reason: String },

    /// A derived count is negative, or a key expected during assembly is
    /// absent. Always names the offending key.
    #[error("invariant violated for {key}: {detail}")]
    InvariantViolation { key: ContingencyKey, detail: String },

    /// Invalid stopword source, non-positive K, and similar.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invariant(key: ContingencyKey, detail: impl Into<String>) -> Self {
        Error::InvariantViolation {
            key,
            detail: detail.into(),
        }
    }

    pub fn malformed(line: Option<usize>, reason: impl Into<String>) -> Self {
        Error::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    /// Only malformed records may be skipped; everything else stops the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::MalformedRecord { .. })
    }
}

fn describe_line(line: &Option<usize>) -> String {
    match line {
        Some(n) => format!(" at line {n}"),
        None => String::new(),
    }
}
