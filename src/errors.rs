//! Error taxonomy for mosaic analysis
//!
//! One enum covers the whole pipeline; every variant is terminal for the
//! invocation (batch processing, no retries).

use thiserror::Error;

/// Errors for mosaic parsing and analysis
#[derive(Error, Debug)]
pub enum PatError {
    /// Malformed traffic record: wrong field count or non-numeric value
    #[error("malformed record at line {line}: {reason}: {content:?}")]
    Parse {
        line: usize,
        reason: String,
        content: String,
    },

    /// Invalid parameter combination, detected before any file I/O
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Delta computation over mosaics of different rank universes
    #[error(
        "communications matrices must be the same size (reference: {reference} ranks, test: {test} ranks)"
    )]
    SizeMismatch { reference: usize, test: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type for mosaic operations
pub type Result<T> = std::result::Result<T, PatError>;
