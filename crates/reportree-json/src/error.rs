//! Error types for the flat reporter.

use thiserror::Error;

/// Errors produced while emitting a flat report.
#[derive(Debug, Error)]
pub enum FlatError {
    /// The report could not be serialized or written.
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}
