//! Error types for the note editor core
//!
//! Editing operations never fail from the caller's point of view. These
//! errors only travel between internal steps, and the editor turns each one
//! into a recovered document state before returning.

use thiserror::Error;

/// Failure to read the structured interchange form
#[derive(Debug, Error)]
pub enum InterchangeError {
    /// Input is not valid JSON or does not have the record shape
    #[error("Invalid interchange JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Top-level value is valid JSON but not a list of records
    #[error("Interchange data must be a list of fragment records")]
    NotAList,

    /// A record names a format this editor does not know
    #[error("Unknown format name: {0}")]
    UnknownFormat(String),
}
