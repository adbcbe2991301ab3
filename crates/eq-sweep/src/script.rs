//! Runner invocation scripts.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::grid::SweepPoint;

/// Fixed runner parameters shared by every point of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSettings {
    /// Path to the simulation binary, as seen from the job's working directory.
    pub binary: String,
    pub omp_num_threads: u32,
    pub n: u32,
    pub num_steps: u64,
    pub num_simulations: u64,
    /// Experiment tag written into every run's metadata.
    pub tag: Option<String>,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            binary: "./cmake-build-release/apps/diversity_counts".to_string(),
            omp_num_threads: 100,
            n: 100,
            num_steps: 10_000_000,
            num_simulations: 10_000,
            tag: None,
        }
    }
}

/// Shell script running the simulation for one grid point.
pub fn render_script(runner: &RunnerSettings, point: &SweepPoint) -> String {
    let mut args = vec![
        format!("--N={}", runner.n),
        format!("--birth-mutation-rate={}", point.birth_mutation_rate),
        format!(
            "--independent-mutation-rate={}",
            point.independent_mutation_rate
        ),
        format!("--num-steps={}", runner.num_steps),
        format!("--graph-name={}", shell_quote(&point.graph_name)),
        format!("--num-simulations={}", runner.num_simulations),
        format!("--dynamic={}", shell_quote(&point.dynamic)),
    ];
    if let Some(tag) = &runner.tag {
        args.push(format!("--tag={}", shell_quote(tag)));
    }

    let mut script = String::from("#!/bin/bash\n");
    let _ = write!(
        script,
        "OMP_NUM_THREADS={} \\\n  {}",
        runner.omp_num_threads,
        shell_quote(&runner.binary)
    );
    for arg in &args {
        let _ = write!(script, " \\\n  {}", arg);
    }
    script.push('\n');
    script
}

fn shell_quote(value: &str) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | '%' | '+'));
    if safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', "'\\''"))
    }
}
