//! Collation entry point.

use chrono::{DateTime, Utc};
use eq_records::{RecordResult, RunRecordStore};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::{CollateConfig, CollateOptions, ErrorPolicy};
use crate::emit::{output_file_name, render_csv, write_output};
use crate::error::CollateResult;
use crate::filter::matches_tag;
use crate::normalize::normalize;
use crate::row::{Row, flatten};

/// Request to collate every run carrying `tag`.
#[derive(Debug, Clone)]
pub struct CollateRequest<'a> {
    pub config: &'a CollateConfig,
    pub tag: &'a str,
    pub options: CollateOptions,
}

/// Rows gathered from the input directory, before rendering.
#[derive(Debug, Clone, Default)]
pub struct Collected {
    pub rows: Vec<Row>,
    pub files_scanned: usize,
    pub records_matched: usize,
    pub files_skipped: usize,
}

/// Outcome of a completed collation.
#[derive(Debug, Clone)]
pub struct CollateReport {
    pub output_path: PathBuf,
    pub files_scanned: usize,
    pub records_matched: usize,
    pub files_skipped: usize,
    pub rows_written: usize,
}

/// Load every run in the store and flatten the ones tagged `tag`.
///
/// Rows follow discovery order, then observation order within each file.
pub fn collect_rows(
    store: &RunRecordStore,
    tag: &str,
    policy: ErrorPolicy,
) -> CollateResult<Collected> {
    let mut collected = Collected::default();

    for path in store.discover()? {
        collected.files_scanned += 1;

        let Some(record) = admit(store.load(&path), policy, &mut collected)? else {
            continue;
        };

        if !matches_tag(&record, tag) {
            debug!(path = %path.display(), tag = ?record.tag(), "tag does not match");
            continue;
        }

        // Layout is only checked for selected runs.
        let Some(shape) = admit(record.results_shape(), policy, &mut collected)? else {
            continue;
        };

        collected.records_matched += 1;
        let before = collected.rows.len();
        collected.rows.extend(
            normalize(&shape)
                .iter()
                .map(|pair| flatten(&record, pair)),
        );
        debug!(
            path = %path.display(),
            rows = collected.rows.len() - before,
            "collected run"
        );
    }

    Ok(collected)
}

/// Apply the error policy to one step of reading a run file.
fn admit<T>(
    result: RecordResult<T>,
    policy: ErrorPolicy,
    collected: &mut Collected,
) -> CollateResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) => match policy {
            ErrorPolicy::FailFast => Err(err.into()),
            ErrorPolicy::SkipInvalid => {
                warn!(path = %err.path().display(), error = %err, "skipping unreadable run file");
                collected.files_skipped += 1;
                Ok(None)
            }
        },
    }
}

/// Collate and write one CSV, named relative to the current time.
pub fn collate(request: &CollateRequest<'_>) -> CollateResult<CollateReport> {
    collate_at(request, Utc::now())
}

/// Like [`collate`] with an explicit clock reading for the output name.
///
/// Nothing is written until every row has been collected, so a failure
/// while reading leaves the output directory untouched.
pub fn collate_at(request: &CollateRequest<'_>, now: DateTime<Utc>) -> CollateResult<CollateReport> {
    let store = RunRecordStore::new(&request.config.input_dir);
    let collected = collect_rows(&store, request.tag, request.options.policy)?;

    let csv = render_csv(request.options.columns.columns(), &collected.rows);
    let file_name = output_file_name(&request.options.naming, &csv, now);
    let output_path = write_output(&request.config.output_dir, &file_name, &csv)?;

    let report = CollateReport {
        output_path,
        files_scanned: collected.files_scanned,
        records_matched: collected.records_matched,
        files_skipped: collected.files_skipped,
        rows_written: collected.rows.len(),
    };

    info!(
        tag = request.tag,
        output = %report.output_path.display(),
        files = report.files_scanned,
        matched = report.records_matched,
        skipped = report.files_skipped,
        rows = report.rows_written,
        "collation complete"
    );

    Ok(report)
}
