//! Error handling for the claims scoring pipeline.

pub mod util;

use std::io;
use std::path::PathBuf;

use arrow::error::ArrowError;

/// Specialized error type for the claims pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Error talking to the relational store
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Error building or reading Arrow data
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error decoding a JSON document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A model artifact is missing, corrupt or incompatible with its input
    #[error("Model artifact error ({}): {reason}", path.display())]
    ModelArtifact {
        /// Path of the artifact
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// An outlier score outside [-1, 1] was handed to the normalizer
    #[error("Score out of range: {0} is not within [-1, 1]")]
    ScoreOutOfRange(f64),

    /// A claim identifier occurs more than once and duplicates are rejected
    #[error("Duplicate claim identifier: {0}")]
    DuplicateClaim(String),

    /// A required column is absent
    #[error("Column not found: {column}")]
    ColumnNotFound {
        /// Name of the missing column
        column: String,
    },

    /// Data that cannot be interpreted
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Build a model artifact error for `path`
    pub fn artifact(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ModelArtifact {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
