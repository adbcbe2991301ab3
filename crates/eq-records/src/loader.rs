//! Reading a single run file into a `RunRecord`.

use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::types::{Fields, RunRecord};
use crate::{RecordError, RecordResult};

/// Read and parse one run file.
pub fn load_record(path: &Path) -> RecordResult<RunRecord> {
    let content = fs::read_to_string(path).map_err(|e| RecordError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_record(path, &content)
}

/// Parse run file content; `path` is only used for error reporting.
///
/// Only the top-level keys are checked here. The `results` layout is left
/// to [`RunRecord::results_shape`].
pub fn parse_record(path: &Path, content: &str) -> RecordResult<RunRecord> {
    let document: Value = serde_json::from_str(content).map_err(|e| RecordError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    let root = document.as_object().ok_or_else(|| RecordError::InvalidField {
        path: path.to_path_buf(),
        key: "<root>".to_string(),
        expected: "an object",
    })?;

    let config = field_set(path, root.get("config"), "config")?;
    let metadata = field_set(path, root.get("metadata"), "metadata")?;

    let results = root
        .get("results")
        .cloned()
        .ok_or_else(|| RecordError::MissingKey {
            path: path.to_path_buf(),
            key: "results".to_string(),
        })?;

    Ok(RunRecord {
        source: path.to_path_buf(),
        config,
        metadata,
        results,
    })
}

fn field_set(path: &Path, value: Option<&Value>, key: &str) -> RecordResult<Fields> {
    match value {
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(_) => Err(RecordError::InvalidField {
            path: path.to_path_buf(),
            key: key.to_string(),
            expected: "an object",
        }),
        None => Err(RecordError::MissingKey {
            path: path.to_path_buf(),
            key: key.to_string(),
        }),
    }
}
