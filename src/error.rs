//! Error types for the conversion pipeline.
//!
//! Only problems that make the whole run meaningless are errors here.
//! Per-record issues (missing or malformed dates, unknown recurrence
//! types) degrade to documented fallbacks and surface as run warnings
//! instead.

use thiserror::Error;

/// Fatal errors that abort a conversion before any entity is created.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input parsed as JSON but matches no supported export shape.
    #[error("unrecognized export shape: {0}")]
    UnrecognizedExport(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for conversion operations.
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;
