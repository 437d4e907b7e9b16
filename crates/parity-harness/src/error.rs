//! Harness error types.
//!
//! These are the fatal outcomes: anything here aborts fixture generation.
//! Expected baseline failures are not errors at this level; the collector
//! captures those as fixture data.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("baseline engine root not found: {0}")]
    BaselineMissing(PathBuf),

    #[error("unknown mode: {0}")]
    UnknownMode(String),

    #[error("case {case_id} is malformed: {message}")]
    MalformedCase { case_id: String, message: String },

    #[error("baseline engine failed on case {case_id}: {message}")]
    Engine { case_id: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
