//! Error kinds surfaced by scoring operations
//!
//! Every public operation returns `Result<_, ScoringError>`; the boundary
//! converts failures into `{"error": <message>}` with [`into_payload`].

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// The dataset file (or in-memory table) does not exist
    #[error("data file not found: {0}")]
    NotFound(String),

    /// Region absent, or present without usable year/value data
    #[error("{0}")]
    NoData(String),

    #[error("no common sectors between nominal output and real growth data")]
    NoCommonSectors,

    #[error("unexpected column layout in {dataset} data: expected at least {expected} columns, found {found}")]
    MalformedShape {
        dataset: String,
        expected: usize,
        found: usize,
    },

    /// The table reader failed on an existing file
    #[error("failed to read {dataset} data: {message}")]
    Read { dataset: String, message: String },
}

impl ScoringError {
    pub fn region_not_found(region: &str, dataset: &str) -> Self {
        ScoringError::NoData(format!("region not found ({}): {}", dataset, region))
    }
}

/// Convert an operation result into a response payload
///
/// Success serializes the value; failure becomes `{"error": message}`.
pub fn into_payload<T: Serialize>(result: Result<T, ScoringError>) -> Value {
    match result {
        Ok(value) => serde_json::to_value(value)
            .unwrap_or_else(|e| json!({ "error": format!("failed to serialize response: {}", e) })),
        Err(e) => json!({ "error": e.to_string() }),
    }
}
