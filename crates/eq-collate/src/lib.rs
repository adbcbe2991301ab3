//! Collation of per-run records into a single flat CSV.
//!
//! Pipeline: discover -> load -> filter by tag -> normalize results ->
//! flatten into rows -> render and write one CSV file.

pub mod config;
pub mod emit;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod pipeline;
pub mod row;

pub use config::{
    CollateConfig, CollateOptions, ColumnSet, ErrorPolicy, OutputNaming, load_yaml,
};
pub use emit::{FULL_COLUMNS, LEGACY_COLUMNS, output_file_name, render_csv, write_output};
pub use error::{CollateError, CollateResult};
pub use filter::matches_tag;
pub use normalize::{NormalizedObservation, normalize};
pub use pipeline::{CollateReport, CollateRequest, Collected, collate, collate_at, collect_rows};
pub use row::{FieldSource, Row, flatten};
