//! Error types for the clustering engine.

use thiserror::Error;

/// Errors produced by loading, configuring, navigating and fitting.
///
/// Every error is local to the call that produced it: a failed load keeps the
/// previously built index active, and a failed navigation call leaves the index
/// untouched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClusterError {
    /// A point has a non-finite or out-of-range coordinate, or a duplicate id.
    #[error("Invalid point: {0}")]
    InvalidPoint(String),

    /// Clustering or fit options are out of range.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The identifier does not belong to the current build.
    #[error("Unknown cluster: {0}")]
    UnknownCluster(String),

    /// The bounding box cannot be fitted into a viewport.
    #[error("Degenerate bounds: {0}")]
    DegenerateBounds(String),

    #[error("Serialization error: {0}")]
    SerializationErrorWithContext(String),
}

pub type Result<T> = std::result::Result<T, ClusterError>;

impl From<serde_json::Error> for ClusterError {
    fn from(e: serde_json::Error) -> Self {
        ClusterError::SerializationErrorWithContext(e.to_string())
    }
}
