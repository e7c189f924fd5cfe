//! File-level error types for the record readers and writers.
//!
//! Malformed lines inside a record file are not errors at this level; they
//! are skipped or rejected by the codec and only reported through tracing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised when a record file cannot be read or written as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordIoError {
    /// The file to load does not exist.
    #[error("record file '{path}' not found", path = path.display())]
    NotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("failed to read record file '{path}': {message}", path = path.display())]
    Read {
        /// Path that was requested.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The destination could not be written.
    #[error("failed to write record file '{path}': {message}", path = path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },
}
