//! Collation configuration.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::emit::{FULL_COLUMNS, LEGACY_COLUMNS};
use crate::error::{CollateError, CollateResult};

/// Read a YAML config file into `T`.
pub fn load_yaml<T: DeserializeOwned>(path: &Path) -> CollateResult<T> {
    let content = std::fs::read_to_string(path).map_err(|e| CollateError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_yaml::from_str(&content).map_err(|e| CollateError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Where run files are read from and where the CSV is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollateConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for CollateConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("processed-data"),
        }
    }
}

/// What to do with a run file that cannot be loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Abort the whole collation on the first bad file.
    #[default]
    FailFast,
    /// Log the file and carry on without it.
    SkipInvalid,
}

/// How the output file is named.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputNaming {
    /// `collated-result-<unix-seconds>.csv`
    #[default]
    Timestamp,
    /// Caller-supplied file name, used verbatim.
    Named(String),
    /// `collated-result-<sha256 prefix of the CSV>.csv`
    ContentHash,
}

/// Column layout of the output file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnSet {
    /// Superset of every historical layout.
    #[default]
    Full,
    /// Columns of the earliest single-measure exports.
    Legacy,
}

impl ColumnSet {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            ColumnSet::Full => FULL_COLUMNS,
            ColumnSet::Legacy => LEGACY_COLUMNS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollateOptions {
    pub policy: ErrorPolicy,
    pub naming: OutputNaming,
    pub columns: ColumnSet,
}
