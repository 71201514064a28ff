//! Error types for log ingestion.

use thiserror::Error;

use crate::persist::PersistError;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a line could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A timestamp field was not a digit run of the expected width, or the
    /// fields do not name a real point in time.
    #[error("malformed timestamp ({field})")]
    MalformedTimestamp {
        /// Field that failed.
        field: &'static str,
    },

    /// The lead marker or special-line grammar matched nothing.
    #[error("unrecognized line format: {reason}")]
    UnrecognizedLineFormat {
        /// What was expected.
        reason: &'static str,
    },
}

/// Errors that stop an ingestion run.
#[derive(Debug, Error)]
pub enum Error {
    /// A line could not be decoded. Ingestion stops at this line.
    #[error("log file corrupt near line {line}: {content}")]
    Corrupt {
        /// 1-based line number.
        line: u64,
        /// Byte offset within the line where decoding failed.
        column: usize,
        /// Raw line text.
        content: String,
        /// Underlying parse failure.
        #[source]
        source: ParseError,
    },

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] PersistError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for the corrupt-line variant.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Error::Corrupt { .. })
    }
}
