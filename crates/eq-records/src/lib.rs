//! eq-records: per-run simulation records and the directory they live in.
//!
//! Contains:
//! - types (RunRecord, ResultsShape, MeasureCounts, Observation)
//! - shape (structural detection of the two historical result layouts)
//! - loader (file -> RunRecord)
//! - store (discovery of run files inside an input directory)

pub mod loader;
pub mod shape;
pub mod store;
pub mod types;

pub use loader::{load_record, parse_record};
pub use shape::ShapeError;
pub use store::RunRecordStore;
pub use types::*;

use std::path::PathBuf;

pub type RecordResult<T> = Result<T, RecordError>;

#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed run record {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Run record {path} is missing required key '{key}'")]
    MissingKey { path: PathBuf, key: String },

    #[error("Run record {path} has invalid '{key}': expected {expected}")]
    InvalidField {
        path: PathBuf,
        key: String,
        expected: &'static str,
    },
}

impl RecordError {
    /// File the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            RecordError::Io { path, .. }
            | RecordError::Parse { path, .. }
            | RecordError::MissingKey { path, .. }
            | RecordError::InvalidField { path, .. } => path,
        }
    }

    pub(crate) fn from_shape(path: PathBuf, err: ShapeError) -> Self {
        match err {
            ShapeError::MissingKey { key } => RecordError::MissingKey { path, key },
            ShapeError::InvalidField { key, expected } => {
                RecordError::InvalidField { path, key, expected }
            }
        }
    }
}
