//! eq-sweep: submitting a parameter sweep of simulation runs to a batch
//! scheduler.
//!
//! Contains:
//! - grid (axes of the sweep and their cartesian product)
//! - script (runner invocation script for one grid point)
//! - scheduler (scheduler directives and the submission seam)
//! - submit (preparing scripts and submitting the whole sweep)

pub mod grid;
pub mod scheduler;
pub mod script;
pub mod submit;

pub use grid::{SweepGrid, SweepPoint};
pub use scheduler::{SbatchScheduler, Scheduler, SchedulerDirectives, Submission, parse_job_id};
pub use script::{RunnerSettings, render_script};
pub use submit::{PreparedJob, SweepConfig, SweepOutcome, prepare_jobs, submit_sweep};

use std::path::PathBuf;

pub type SweepResult<T> = Result<T, SweepError>;

#[derive(thiserror::Error, Debug)]
pub enum SweepError {
    #[error("Sweep grid axis '{axis}' is empty")]
    EmptyAxis { axis: &'static str },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("Scheduler rejected {script}: {stderr}")]
    Rejected {
        script: PathBuf,
        status: Option<i32>,
        stderr: String,
    },
}
