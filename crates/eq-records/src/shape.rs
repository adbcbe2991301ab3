//! Structural detection of the `results` layout.
//!
//! Run files carry no schema version, so the layout is recognised from
//! its structure alone: a sequence of named entries is the multi-measure
//! layout, an object holding `diversity_counts` is the single-measure one.
//! Anything else is rejected.

use serde_json::Value;

use crate::types::{MeasureCounts, Observation, ResultsShape};

/// Shape problem inside a document, keyed by a dotted path such as
/// `results[1].diversity_counts[0].count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    MissingKey { key: String },
    InvalidField { key: String, expected: &'static str },
}

impl ResultsShape {
    /// Detect the layout of a `results` value.
    pub fn detect(results: &Value) -> Result<Self, ShapeError> {
        match results {
            Value::Array(entries) => entries
                .iter()
                .enumerate()
                .map(|(idx, entry)| parse_measure(entry, &format!("results[{}]", idx)))
                .collect::<Result<Vec<_>, _>>()
                .map(ResultsShape::MultiMeasure),
            Value::Object(map) => {
                let counts = map.get("diversity_counts").ok_or_else(|| ShapeError::MissingKey {
                    key: "results.diversity_counts".to_string(),
                })?;
                let diversity_counts = parse_observations(counts, "results.diversity_counts")?;
                Ok(ResultsShape::SingleMeasure { diversity_counts })
            }
            _ => Err(ShapeError::InvalidField {
                key: "results".to_string(),
                expected: "an object or an array of measures",
            }),
        }
    }
}

fn parse_measure(entry: &Value, prefix: &str) -> Result<MeasureCounts, ShapeError> {
    let map = entry.as_object().ok_or_else(|| ShapeError::InvalidField {
        key: prefix.to_string(),
        expected: "an object",
    })?;

    let measure_key = format!("{}.diversity_measure", prefix);
    let diversity_measure = match map.get("diversity_measure") {
        Some(Value::String(name)) => name.clone(),
        Some(_) => {
            return Err(ShapeError::InvalidField {
                key: measure_key,
                expected: "a string",
            });
        }
        None => return Err(ShapeError::MissingKey { key: measure_key }),
    };

    let counts_key = format!("{}.diversity_counts", prefix);
    let counts = map
        .get("diversity_counts")
        .ok_or_else(|| ShapeError::MissingKey {
            key: counts_key.clone(),
        })?;

    Ok(MeasureCounts {
        diversity_measure,
        diversity_counts: parse_observations(counts, &counts_key)?,
    })
}

fn parse_observations(counts: &Value, prefix: &str) -> Result<Vec<Observation>, ShapeError> {
    // The writer emits `null` instead of `[]` for a measure with no buckets.
    if counts.is_null() {
        return Ok(Vec::new());
    }

    let items = counts.as_array().ok_or_else(|| ShapeError::InvalidField {
        key: prefix.to_string(),
        expected: "an array of observations",
    })?;

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| parse_observation(item, &format!("{}[{}]", prefix, idx)))
        .collect()
}

fn parse_observation(item: &Value, prefix: &str) -> Result<Observation, ShapeError> {
    let map = item.as_object().ok_or_else(|| ShapeError::InvalidField {
        key: prefix.to_string(),
        expected: "an object",
    })?;

    let diversity = map
        .get("diversity")
        .cloned()
        .ok_or_else(|| ShapeError::MissingKey {
            key: format!("{}.diversity", prefix),
        })?;

    let count_key = format!("{}.count", prefix);
    let count = match map.get("count") {
        Some(value) => value.as_u64().ok_or(ShapeError::InvalidField {
            key: count_key,
            expected: "a non-negative integer",
        })?,
        None => return Err(ShapeError::MissingKey { key: count_key }),
    };

    Ok(Observation { diversity, count })
}
