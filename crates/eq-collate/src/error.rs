//! Error types for collation.

use std::path::PathBuf;

use eq_records::RecordError;

#[derive(Debug, thiserror::Error)]
pub enum CollateError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("Invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Failed to write collated output {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type CollateResult<T> = Result<T, CollateError>;
