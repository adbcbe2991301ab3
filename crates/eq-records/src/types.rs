//! Run record data types.

use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::{RecordError, RecordResult};

/// Flat string-keyed field set, as found under `config` and `metadata`.
pub type Fields = Map<String, Value>;

/// One completed simulation run, loaded from a single file.
///
/// `results` is kept as read; its layout is only checked by
/// [`RunRecord::results_shape`], so records that are filtered out never
/// need a recognisable layout.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    /// File the record was read from.
    pub source: PathBuf,
    /// Simulation parameters (N, graph_name, mutation rates, step counts, ...).
    pub config: Fields,
    /// Provenance (tag, start/end timestamps, dynamic in later files).
    pub metadata: Fields,
    pub results: Value,
}

impl RunRecord {
    /// The experiment tag, if present and a string.
    pub fn tag(&self) -> Option<&str> {
        self.metadata.get("tag").and_then(Value::as_str)
    }

    /// Detect the layout of `results`, naming this record's file on failure.
    pub fn results_shape(&self) -> RecordResult<ResultsShape> {
        ResultsShape::detect(&self.results)
            .map_err(|e| RecordError::from_shape(self.source.clone(), e))
    }
}

/// The two result layouts found in historical run files.
///
/// Closed on purpose: a third layout must be added here and matched
/// everywhere, never guessed at.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsShape {
    /// `{ "diversity_counts": [...] }` with an implicit, unnamed measure.
    SingleMeasure { diversity_counts: Vec<Observation> },
    /// `[{ "diversity_measure": "...", "diversity_counts": [...] }, ...]`
    MultiMeasure(Vec<MeasureCounts>),
}

impl ResultsShape {
    /// Total number of observations across every measure.
    pub fn observation_count(&self) -> usize {
        match self {
            ResultsShape::SingleMeasure { diversity_counts } => diversity_counts.len(),
            ResultsShape::MultiMeasure(measures) => {
                measures.iter().map(|m| m.diversity_counts.len()).sum()
            }
        }
    }
}

/// Histogram of one named diversity measure.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureCounts {
    pub diversity_measure: String,
    pub diversity_counts: Vec<Observation>,
}

/// One histogram bucket: how many simulations ended at a diversity value.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub diversity: Value,
    pub count: u64,
}
