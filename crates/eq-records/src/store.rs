//! Run file discovery.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::types::RunRecord;
use crate::{RecordError, RecordResult, load_record};

/// A directory of run files, one JSON document per completed run.
#[derive(Clone, Debug)]
pub struct RunRecordStore {
    root_dir: PathBuf,
}

impl RunRecordStore {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// List `*.json` files directly inside the store, sorted by path.
    pub fn discover(&self) -> RecordResult<Vec<PathBuf>> {
        let io_err = |e| RecordError::Io {
            path: self.root_dir.clone(),
            source: e,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.root_dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }

        paths.sort();
        debug!(dir = %self.root_dir.display(), files = paths.len(), "discovered run files");
        Ok(paths)
    }

    pub fn load(&self, path: &Path) -> RecordResult<RunRecord> {
        load_record(path)
    }
}
