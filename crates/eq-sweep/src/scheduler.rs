//! Batch scheduler submission.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;

use crate::{SweepError, SweepResult};

/// Resource and bookkeeping directives attached to every job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerDirectives {
    pub job_name: String,
    pub mail_type: Option<String>,
    pub mail_user: Option<String>,
    pub mem_per_cpu: String,
    /// `days-hours:minutes:seconds`
    pub time_limit: String,
    pub ntasks: u32,
    /// Log path pattern; `%j` expands to the job id.
    pub output: String,
}

impl Default for SchedulerDirectives {
    fn default() -> Self {
        Self {
            job_name: "Equilibrium".to_string(),
            mail_type: Some("ALL".to_string()),
            mail_user: None,
            mem_per_cpu: "2G".to_string(),
            time_limit: "0-72:00:00".to_string(),
            ntasks: 100,
            output: "./slurm/%j.out".to_string(),
        }
    }
}

impl SchedulerDirectives {
    /// Directives as sbatch command-line arguments.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![format!("--job-name={}", self.job_name)];
        if let Some(mail_type) = &self.mail_type {
            args.push(format!("--mail-type={}", mail_type));
        }
        if let Some(mail_user) = &self.mail_user {
            args.push(format!("--mail-user={}", mail_user));
        }
        args.push(format!("--mem-per-cpu={}", self.mem_per_cpu));
        args.push(format!("--time={}", self.time_limit));
        args.push(format!("--ntasks={}", self.ntasks));
        args.push(format!("--output={}", self.output));
        args
    }
}

/// An accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub job_id: Option<String>,
    pub stdout: String,
}

/// Something that accepts job scripts.
pub trait Scheduler {
    fn submit(&self, script: &Path, args: &[String]) -> SweepResult<Submission>;
}

/// Submits through the `sbatch` executable.
#[derive(Debug, Clone)]
pub struct SbatchScheduler {
    program: String,
}

impl Default for SbatchScheduler {
    fn default() -> Self {
        Self::new("sbatch")
    }
}

impl SbatchScheduler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Full command line that `submit` would run.
    pub fn command_line(&self, script: &Path, args: &[String]) -> Vec<String> {
        let mut line = Vec::with_capacity(args.len() + 2);
        line.push(self.program.clone());
        line.extend(args.iter().cloned());
        line.push(script.display().to_string());
        line
    }
}

impl Scheduler for SbatchScheduler {
    fn submit(&self, script: &Path, args: &[String]) -> SweepResult<Submission> {
        let output = Command::new(&self.program)
            .args(args)
            .arg(script)
            .output()
            .map_err(|e| SweepError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(SweepError::Rejected {
                script: script.to_path_buf(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        Ok(Submission {
            job_id: parse_job_id(&stdout),
            stdout,
        })
    }
}

/// Extract the id from sbatch's `Submitted batch job <id>` line.
pub fn parse_job_id(stdout: &str) -> Option<String> {
    stdout.lines().find_map(|line| {
        line.trim()
            .strip_prefix("Submitted batch job ")
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
    })
}
