//! Result normalization.
//!
//! Both result layouts reduce to the same flat sequence of
//! `(measure name, observation)` pairs. Single-measure files have no
//! measure name; multi-measure files carry one per entry.

use eq_records::{Observation, ResultsShape};

/// One observation paired with the measure it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedObservation<'a> {
    /// `None` for the legacy single-measure layout.
    pub measure: Option<&'a str>,
    pub observation: &'a Observation,
}

/// Flatten a record's results into observation pairs, preserving the
/// order of entries and of observations within each entry.
pub fn normalize(results: &ResultsShape) -> Vec<NormalizedObservation<'_>> {
    match results {
        ResultsShape::SingleMeasure { diversity_counts } => diversity_counts
            .iter()
            .map(|observation| NormalizedObservation {
                measure: None,
                observation,
            })
            .collect(),
        ResultsShape::MultiMeasure(measures) => measures
            .iter()
            .flat_map(|entry| {
                entry
                    .diversity_counts
                    .iter()
                    .map(move |observation| NormalizedObservation {
                        measure: Some(entry.diversity_measure.as_str()),
                        observation,
                    })
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eq_records::MeasureCounts;
    use proptest::prelude::*;
    use serde_json::json;

    fn obs(diversity: u64, count: u64) -> Observation {
        Observation {
            diversity: json!(diversity),
            count,
        }
    }

    #[test]
    fn single_measure_pairs_have_no_name() {
        let results = ResultsShape::SingleMeasure {
            diversity_counts: vec![obs(1, 10), obs(2, 3)],
        };

        let pairs = normalize(&results);
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|p| p.measure.is_none()));
        assert_eq!(pairs[1].observation.count, 3);
    }

    #[test]
    fn multi_measure_keeps_entry_then_observation_order() {
        let results = ResultsShape::MultiMeasure(vec![
            MeasureCounts {
                diversity_measure: "richness".to_string(),
                diversity_counts: vec![obs(1, 5), obs(2, 6)],
            },
            MeasureCounts {
                diversity_measure: "shannon".to_string(),
                diversity_counts: vec![obs(0, 11)],
            },
        ]);

        let pairs = normalize(&results);
        let summary: Vec<_> = pairs
            .iter()
            .map(|p| (p.measure.unwrap(), p.observation.count))
            .collect();
        assert_eq!(
            summary,
            vec![("richness", 5), ("richness", 6), ("shannon", 11)]
        );
    }

    #[test]
    fn measure_without_observations_contributes_nothing() {
        let results = ResultsShape::MultiMeasure(vec![MeasureCounts {
            diversity_measure: "richness".to_string(),
            diversity_counts: vec![],
        }]);
        assert!(normalize(&results).is_empty());
    }

    proptest! {
        #[test]
        fn single_measure_count_matches_input(counts in prop::collection::vec(0u64..1000, 0..40)) {
            let results = ResultsShape::SingleMeasure {
                diversity_counts: counts.iter().enumerate().map(|(i, c)| obs(i as u64, *c)).collect(),
            };
            let pairs = normalize(&results);
            prop_assert_eq!(pairs.len(), counts.len());
            prop_assert!(pairs.iter().all(|p| p.measure.is_none()));
        }

        #[test]
        fn multi_measure_count_is_sum_of_entries(
            sizes in prop::collection::vec(0usize..12, 0..8)
        ) {
            let measures: Vec<MeasureCounts> = sizes
                .iter()
                .enumerate()
                .map(|(i, size)| MeasureCounts {
                    diversity_measure: format!("measure-{}", i),
                    diversity_counts: (0..*size as u64).map(|d| obs(d, 1)).collect(),
                })
                .collect();
            let results = ResultsShape::MultiMeasure(measures.clone());

            let pairs = normalize(&results);
            prop_assert_eq!(pairs.len(), sizes.iter().sum::<usize>());

            let mut offset = 0;
            for (entry, size) in measures.iter().zip(&sizes) {
                for pair in &pairs[offset..offset + size] {
                    prop_assert_eq!(pair.measure, Some(entry.diversity_measure.as_str()));
                }
                offset += size;
            }
        }
    }
}
