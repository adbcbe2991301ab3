//! Tag selection.

use eq_records::RunRecord;

/// True iff the record's `metadata.tag` is a string equal to `tag`.
///
/// Comparison is exact. A record without a tag never matches, not even
/// the empty tag.
pub fn matches_tag(record: &RunRecord, tag: &str) -> bool {
    record.tag() == Some(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eq_records::Fields;
    use serde_json::{Value, json};
    use std::path::PathBuf;

    fn record_with_metadata(metadata: Value) -> RunRecord {
        RunRecord {
            source: PathBuf::from("run.json"),
            config: Fields::new(),
            metadata: metadata.as_object().cloned().unwrap_or_default(),
            results: json!({"diversity_counts": []}),
        }
    }

    #[test]
    fn equal_tag_matches() {
        let record = record_with_metadata(json!({"tag": "exp1"}));
        assert!(matches_tag(&record, "exp1"));
        assert!(!matches_tag(&record, "exp2"));
    }

    #[test]
    fn comparison_is_case_sensitive_and_literal() {
        let record = record_with_metadata(json!({"tag": "Exp1"}));
        assert!(!matches_tag(&record, "exp1"));
        assert!(!matches_tag(&record, "Exp*"));
    }

    #[test]
    fn absent_tag_never_matches() {
        let record = record_with_metadata(json!({"start_time_s": 1}));
        assert!(!matches_tag(&record, "exp1"));
        assert!(!matches_tag(&record, ""));
    }

    #[test]
    fn empty_string_tag_matches_empty_filter() {
        let record = record_with_metadata(json!({"tag": ""}));
        assert!(matches_tag(&record, ""));
    }

    #[test]
    fn null_tag_never_matches() {
        let record = record_with_metadata(json!({"tag": null}));
        assert!(!matches_tag(&record, ""));
    }
}
