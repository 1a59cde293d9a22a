/// Error types for the report module
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while locating or parsing a RUGAR report
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report file does not exist
    #[error("Report not found: {}", path.display())]
    NotFound {
        path: PathBuf,
    },

    /// An operator block could not be split into id, name and groups
    #[error("Malformed record #{index} (operator '{operator_id}'): {reason}")]
    MalformedRecord {
        /// Zero-based position of the block in the report
        index: usize,
        /// Whatever could be read of the operator id, possibly empty
        operator_id: String,
        reason: String,
    },

    /// Report date is not a valid `YYYYMMDD` calendar date
    #[error("Invalid report date '{0}', expected YYYYMMDD")]
    InvalidDate(String),

    /// File system errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking parse task panicked or was cancelled
    #[error("Report parsing task failed: {0}")]
    Task(String),
}
