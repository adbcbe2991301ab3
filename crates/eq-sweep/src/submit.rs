//! Sweep preparation and submission.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::grid::{SweepGrid, SweepPoint};
use crate::scheduler::{Scheduler, SchedulerDirectives, Submission};
use crate::script::{RunnerSettings, render_script};
use crate::{SweepError, SweepResult};

/// Everything needed to submit a sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub grid: SweepGrid,
    pub runner: RunnerSettings,
    pub directives: SchedulerDirectives,
}

/// A job script written to disk and ready for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedJob {
    pub point: SweepPoint,
    pub script_path: PathBuf,
    pub args: Vec<String>,
}

/// Result of submitting one prepared job.
#[derive(Debug)]
pub struct SweepOutcome {
    pub point: SweepPoint,
    pub script_path: PathBuf,
    pub result: SweepResult<Submission>,
}

/// Write one script per grid point (at most `limit`) into `script_dir`.
pub fn prepare_jobs(
    config: &SweepConfig,
    script_dir: &Path,
    limit: Option<usize>,
) -> SweepResult<Vec<PreparedJob>> {
    config.grid.validate()?;

    fs::create_dir_all(script_dir).map_err(|e| SweepError::Io {
        path: script_dir.to_path_buf(),
        source: e,
    })?;

    let args = config.directives.to_args();
    let points = config.grid.points();
    let take = limit.unwrap_or(points.len());

    let mut jobs = Vec::with_capacity(take.min(points.len()));
    for (idx, point) in points.into_iter().take(take).enumerate() {
        let script_path = script_dir.join(format!(
            "sweep-{:03}-{}-{}.sh",
            idx, point.graph_name, point.dynamic
        ));
        let script = render_script(&config.runner, &point);
        fs::write(&script_path, script).map_err(|e| SweepError::Io {
            path: script_path.clone(),
            source: e,
        })?;

        jobs.push(PreparedJob {
            point,
            script_path,
            args: args.clone(),
        });
    }

    Ok(jobs)
}

/// Prepare and submit the sweep.
///
/// A rejected submission is logged and recorded; the remaining points are
/// still submitted. Only failures to prepare scripts abort the sweep.
pub fn submit_sweep(
    config: &SweepConfig,
    scheduler: &dyn Scheduler,
    script_dir: &Path,
    limit: Option<usize>,
) -> SweepResult<Vec<SweepOutcome>> {
    let jobs = prepare_jobs(config, script_dir, limit)?;
    info!(jobs = jobs.len(), grid = config.grid.len(), "submitting sweep");

    let outcomes: Vec<SweepOutcome> = jobs
        .into_iter()
        .map(|job| {
            let result = scheduler.submit(&job.script_path, &job.args);
            match &result {
                Ok(submission) => info!(
                    point = %job.point,
                    job_id = submission.job_id.as_deref().unwrap_or("?"),
                    "job submitted"
                ),
                Err(err) => warn!(point = %job.point, error = %err, "job submission failed"),
            }
            SweepOutcome {
                point: job.point,
                script_path: job.script_path,
                result,
            }
        })
        .collect();

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!(
        submitted = outcomes.len() - failed,
        failed, "sweep submission finished"
    );

    Ok(outcomes)
}
