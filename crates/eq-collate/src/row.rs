//! Row flattening.
//!
//! A row is built by merging named field sets in a fixed order. Later
//! sources overwrite earlier ones on key collision.

use eq_records::{Fields, Observation, RunRecord};
use serde_json::Value;

use crate::normalize::NormalizedObservation;

/// One flat, denormalized output row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Fields,
}

impl Row {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Apply one source on top of the current fields.
    fn merge(&mut self, source: &FieldSource<'_>) {
        match source {
            FieldSource::Config(fields) | FieldSource::Metadata(fields) => {
                for (key, value) in fields.iter() {
                    self.fields.insert(key.clone(), value.clone());
                }
            }
            FieldSource::Measure(name) => {
                self.fields
                    .insert("diversity_measure".to_string(), Value::from(*name));
            }
            FieldSource::Observation(observation) => {
                self.fields
                    .insert("diversity".to_string(), observation.diversity.clone());
                self.fields
                    .insert("count".to_string(), Value::from(observation.count));
            }
        }
    }

    /// Merge sources left to right.
    pub fn from_sources(sources: &[FieldSource<'_>]) -> Self {
        let mut row = Row::default();
        for source in sources {
            row.merge(source);
        }
        row
    }
}

/// A named field set contributing to a row.
#[derive(Debug, Clone, Copy)]
pub enum FieldSource<'a> {
    Config(&'a Fields),
    Metadata(&'a Fields),
    Measure(&'a str),
    Observation(&'a Observation),
}

/// Build the row for one observation of a record.
///
/// Precedence, lowest to highest: config, metadata, measure name,
/// observation.
pub fn flatten(record: &RunRecord, pair: &NormalizedObservation<'_>) -> Row {
    let mut sources = vec![
        FieldSource::Config(&record.config),
        FieldSource::Metadata(&record.metadata),
    ];
    if let Some(measure) = pair.measure {
        sources.push(FieldSource::Measure(measure));
    }
    sources.push(FieldSource::Observation(pair.observation));

    Row::from_sources(&sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use eq_records::{MeasureCounts, ResultsShape};
    use serde_json::json;
    use std::path::PathBuf;

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap_or_default()
    }

    fn record(config: Value, metadata: Value) -> RunRecord {
        RunRecord {
            source: PathBuf::from("run.json"),
            config: fields(config),
            metadata: fields(metadata),
            results: Value::Null,
        }
    }

    fn single(diversity: Value, count: u64) -> ResultsShape {
        ResultsShape::SingleMeasure {
            diversity_counts: vec![Observation { diversity, count }],
        }
    }

    #[test]
    fn merges_config_metadata_and_observation() {
        let run = record(
            json!({"N": 100, "graph_name": "star"}),
            json!({"tag": "exp1", "start_time_s": 10}),
        );
        let shape = single(json!(4), 12);

        let pairs = normalize(&shape);
        let row = flatten(&run, &pairs[0]);

        assert_eq!(row.get("N"), Some(&json!(100)));
        assert_eq!(row.get("graph_name"), Some(&json!("star")));
        assert_eq!(row.get("tag"), Some(&json!("exp1")));
        assert_eq!(row.get("diversity"), Some(&json!(4)));
        assert_eq!(row.get("count"), Some(&json!(12)));
        assert_eq!(row.get("diversity_measure"), None);
    }

    #[test]
    fn metadata_overrides_config() {
        let run = record(
            json!({"dynamic": "birth-death", "N": 10}),
            json!({"dynamic": "death-birth"}),
        );
        let shape = single(json!(1), 1);

        let pairs = normalize(&shape);
        let row = flatten(&run, &pairs[0]);
        assert_eq!(row.get("dynamic"), Some(&json!("death-birth")));
    }

    #[test]
    fn observation_overrides_earlier_sources() {
        let run = record(
            json!({"count": "config"}),
            json!({"diversity": "metadata", "diversity_measure": "metadata"}),
        );
        let shape = ResultsShape::MultiMeasure(vec![MeasureCounts {
            diversity_measure: "richness".to_string(),
            diversity_counts: vec![Observation {
                diversity: json!(2),
                count: 7,
            }],
        }]);

        let pairs = normalize(&shape);
        let row = flatten(&run, &pairs[0]);
        assert_eq!(row.get("diversity_measure"), Some(&json!("richness")));
        assert_eq!(row.get("diversity"), Some(&json!(2)));
        assert_eq!(row.get("count"), Some(&json!(7)));
    }

    #[test]
    fn one_row_per_observation() {
        let run = record(json!({}), json!({}));
        let shape = ResultsShape::MultiMeasure(vec![
            MeasureCounts {
                diversity_measure: "a".to_string(),
                diversity_counts: vec![
                    Observation { diversity: json!(1), count: 1 },
                    Observation { diversity: json!(2), count: 1 },
                ],
            },
            MeasureCounts {
                diversity_measure: "b".to_string(),
                diversity_counts: vec![Observation { diversity: json!(1), count: 1 }],
            },
        ]);

        let rows: Vec<Row> = normalize(&shape)
            .iter()
            .map(|pair| flatten(&run, pair))
            .collect();
        assert_eq!(rows.len(), shape.observation_count());
    }

    #[test]
    fn from_sources_is_rightmost_wins() {
        let a = fields(json!({"x": 1, "y": 1}));
        let b = fields(json!({"y": 2}));
        let row = Row::from_sources(&[FieldSource::Config(&a), FieldSource::Metadata(&b)]);
        assert_eq!(row.get("x"), Some(&json!(1)));
        assert_eq!(row.get("y"), Some(&json!(2)));
        assert_eq!(row.get("z"), None);
    }
}
