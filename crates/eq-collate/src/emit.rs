//! CSV rendering and output.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::OutputNaming;
use crate::error::{CollateError, CollateResult};
use crate::row::Row;

pub const FULL_COLUMNS: &[&str] = &[
    "tag",
    "start_time_s",
    "end_time_s",
    "N",
    "graph_name",
    "num_simulations",
    "num_steps",
    "birth_mutation_rate",
    "independent_mutation_rate",
    "dynamic",
    "diversity_measure",
    "diversity",
    "count",
];

pub const LEGACY_COLUMNS: &[&str] = &[
    "N",
    "graph_name",
    "birth_mutation_rate",
    "independent_mutation_rate",
    "num_simulations",
    "num_steps",
    "start_time_s",
    "end_time_s",
    "diversity",
    "count",
];

const OUTPUT_PREFIX: &str = "collated-result-";

/// Render a header line plus one line per row.
///
/// Columns a row lacks render empty; keys outside `columns` are dropped.
pub fn render_csv(columns: &[&str], rows: &[Row]) -> String {
    let mut csv = String::new();
    push_line(&mut csv, columns.iter().map(|c| Cow::Borrowed(*c)));
    for row in rows {
        push_line(
            &mut csv,
            columns
                .iter()
                .map(|column| row.get(column).map(render_scalar).unwrap_or_default()),
        );
    }
    csv
}

fn push_line<'a>(csv: &mut String, fields: impl Iterator<Item = Cow<'a, str>>) {
    for (idx, field) in fields.enumerate() {
        if idx > 0 {
            csv.push(',');
        }
        csv.push_str(&escape_field(&field));
    }
    csv.push('\n');
}

fn render_scalar(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed(""),
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Bool(b) => Cow::Owned(b.to_string()),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Array(_) | Value::Object(_) => Cow::Owned(value.to_string()),
    }
}

fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// File name for a rendered CSV under the given naming scheme.
pub fn output_file_name(naming: &OutputNaming, csv: &str, now: DateTime<Utc>) -> String {
    match naming {
        OutputNaming::Timestamp => format!("{}{}.csv", OUTPUT_PREFIX, now.timestamp()),
        OutputNaming::Named(name) => name.clone(),
        OutputNaming::ContentHash => {
            let digest = Sha256::digest(csv.as_bytes());
            let hex = format!("{:x}", digest);
            format!("{}{}.csv", OUTPUT_PREFIX, &hex[..16])
        }
    }
}

/// Write `contents` to `output_dir/file_name`.
///
/// The file appears only once fully written: contents go to a hidden
/// `.<name>.*.partial` sibling and are renamed into place. The sibling is
/// removed on every error path; only a hard kill between creation and
/// rename can leave one behind. An existing file with the same name is
/// replaced.
pub fn write_output(output_dir: &Path, file_name: &str, contents: &str) -> CollateResult<PathBuf> {
    let final_path = output_dir.join(file_name);
    let write_err = |source: std::io::Error| CollateError::Write {
        path: final_path.clone(),
        source,
    };

    fs::create_dir_all(output_dir).map_err(|e| CollateError::Write {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let mut staged = tempfile::Builder::new()
        .prefix(&format!(".{}.", file_name))
        .suffix(".partial")
        .tempfile_in(output_dir)
        .map_err(write_err)?;
    staged.write_all(contents.as_bytes()).map_err(write_err)?;
    staged.as_file().sync_all().map_err(write_err)?;
    staged.persist(&final_path).map_err(|e| write_err(e.error))?;

    Ok(final_path)
}
