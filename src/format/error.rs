//! Error types for label codec operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while importing or exporting label files.
#[derive(Error, Debug)]
pub enum LabelError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A line of a text label file could not be parsed
    #[error("Malformed line {line} in {path:?}")]
    MalformedLine {
        /// File containing the bad line
        path: PathBuf,
        /// 1-based line number
        line: usize,
    },

    /// A numeric field failed to parse
    #[error("Invalid value for '{field}': {value}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// Offending raw text
        value: String,
    },

    /// Camera index outside the rig
    #[error("Unknown camera index {0}")]
    UnknownCamera(u8),
}
