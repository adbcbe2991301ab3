use clap::{Parser, Subcommand};
use eq_collate::{
    CollateConfig, CollateError, CollateOptions, CollateRequest, ColumnSet, ErrorPolicy,
    OutputNaming, collate, load_yaml,
};
use eq_sweep::{SbatchScheduler, SweepConfig, SweepError, prepare_jobs, submit_sweep};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Collate(#[from] CollateError),

    #[error(transparent)]
    Sweep(#[from] SweepError),

    #[error("{failed} of {total} submissions failed")]
    SubmissionsFailed { failed: usize, total: usize },
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "eq-cli")]
#[command(about = "Equilibrium tools - collate simulation runs and submit parameter sweeps", long_about = None)]
struct Cli {
    /// YAML file with optional `collate:` and `sweep:` sections
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collate tagged run files into a single CSV
    Collate {
        /// Experiment tag to select (exact match)
        #[arg(long)]
        tag: String,
        /// Directory holding the run JSON files
        #[arg(long)]
        input_dir: Option<PathBuf>,
        /// Directory receiving the CSV
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Log and skip unreadable run files instead of aborting
        #[arg(long)]
        skip_invalid: bool,
        /// Emit the ten-column layout of early exports
        #[arg(long)]
        legacy_columns: bool,
        /// Output file name (defaults to collated-result-<unix-seconds>.csv)
        #[arg(long, conflicts_with = "content_hash")]
        output_name: Option<String>,
        /// Name the output after a hash of its content
        #[arg(long)]
        content_hash: bool,
    },
    /// Submit the parameter sweep to the batch scheduler
    Sweep {
        /// Directory receiving the generated job scripts
        #[arg(long, default_value = "sweep-scripts")]
        script_dir: PathBuf,
        /// Submit at most this many grid points
        #[arg(long)]
        limit: Option<usize>,
        /// Tag passed to every run
        #[arg(long)]
        tag: Option<String>,
        /// Scheduler executable
        #[arg(long, default_value = "sbatch")]
        scheduler: String,
        /// Write scripts and print commands without submitting
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ToolConfig {
    collate: CollateConfig,
    sweep: SweepConfig,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Collate {
            tag,
            input_dir,
            output_dir,
            skip_invalid,
            legacy_columns,
            output_name,
            content_hash,
        } => {
            let mut collate_config = config.collate;
            if let Some(dir) = input_dir {
                collate_config.input_dir = dir;
            }
            if let Some(dir) = output_dir {
                collate_config.output_dir = dir;
            }

            let naming = match (output_name, content_hash) {
                (Some(name), _) => OutputNaming::Named(name),
                (None, true) => OutputNaming::ContentHash,
                (None, false) => OutputNaming::Timestamp,
            };
            let options = CollateOptions {
                policy: if skip_invalid {
                    ErrorPolicy::SkipInvalid
                } else {
                    ErrorPolicy::FailFast
                },
                naming,
                columns: if legacy_columns {
                    ColumnSet::Legacy
                } else {
                    ColumnSet::Full
                },
            };

            cmd_collate(&collate_config, &tag, options)
        }
        Commands::Sweep {
            script_dir,
            limit,
            tag,
            scheduler,
            dry_run,
        } => {
            let mut sweep_config = config.sweep;
            if tag.is_some() {
                sweep_config.runner.tag = tag;
            }
            cmd_sweep(&sweep_config, &script_dir, limit, &scheduler, dry_run)
        }
    }
}

fn load_config(path: Option<&Path>) -> CliResult<ToolConfig> {
    let Some(path) = path else {
        return Ok(ToolConfig::default());
    };
    let config = load_yaml(path)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

fn cmd_collate(config: &CollateConfig, tag: &str, options: CollateOptions) -> CliResult<()> {
    let request = CollateRequest {
        config,
        tag,
        options,
    };
    let report = collate(&request)?;

    println!(
        "✓ Wrote {} rows from {} runs to {}",
        report.rows_written,
        report.records_matched,
        report.output_path.display()
    );
    if report.files_skipped > 0 {
        println!("  Skipped {} unreadable files", report.files_skipped);
    }
    Ok(())
}

fn cmd_sweep(
    config: &SweepConfig,
    script_dir: &Path,
    limit: Option<usize>,
    program: &str,
    dry_run: bool,
) -> CliResult<()> {
    let scheduler = SbatchScheduler::new(program);

    if dry_run {
        let commands = dry_run_commands(config, &scheduler, script_dir, limit)?;
        for command in &commands {
            println!("{}", command);
        }
        println!("✓ Prepared {} job scripts in {}", commands.len(), script_dir.display());
        return Ok(());
    }

    let outcomes = submit_sweep(config, &scheduler, script_dir, limit)?;
    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(submission) => println!(
                "✓ {} -> job {}",
                outcome.point,
                submission.job_id.as_deref().unwrap_or("?")
            ),
            Err(err) => {
                failed += 1;
                eprintln!("✗ {}: {}", outcome.point, err);
            }
        }
    }

    if failed > 0 {
        return Err(CliError::SubmissionsFailed {
            failed,
            total: outcomes.len(),
        });
    }
    Ok(())
}

/// Write the job scripts and return the scheduler command for each.
fn dry_run_commands(
    config: &SweepConfig,
    scheduler: &SbatchScheduler,
    script_dir: &Path,
    limit: Option<usize>,
) -> CliResult<Vec<String>> {
    let jobs = prepare_jobs(config, script_dir, limit)?;
    Ok(jobs
        .iter()
        .map(|job| scheduler.command_line(&job.script_path, &job.args).join(" "))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_config_sections_are_optional() {
        let config: ToolConfig = serde_yaml::from_str("collate:\n  input_dir: runs\n").unwrap();
        assert_eq!(config.collate.input_dir, PathBuf::from("runs"));
        assert_eq!(config.collate.output_dir, PathBuf::from("processed-data"));
        assert_eq!(config.sweep, SweepConfig::default());
    }

    #[test]
    fn cli_parses_collate_flags() {
        let cli = Cli::try_parse_from([
            "eq-cli",
            "collate",
            "--tag",
            "exp1",
            "--skip-invalid",
            "--content-hash",
        ])
        .unwrap();
        match cli.command {
            Commands::Collate {
                tag,
                skip_invalid,
                content_hash,
                ..
            } => {
                assert_eq!(tag, "exp1");
                assert!(skip_invalid);
                assert!(content_hash);
            }
            _ => panic!("expected collate"),
        }
    }

    #[test]
    fn output_name_conflicts_with_content_hash() {
        let result = Cli::try_parse_from([
            "eq-cli",
            "collate",
            "--tag",
            "exp1",
            "--output-name",
            "x.csv",
            "--content-hash",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn load_config_without_path_uses_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.collate, CollateConfig::default());
        assert_eq!(config.sweep, SweepConfig::default());
    }

    #[test]
    fn load_config_rejects_invalid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eq.yaml");
        std::fs::write(&path, "collate:\n  input_dir: [runs\n").unwrap();

        match load_config(Some(&path)) {
            Err(CliError::Collate(CollateError::Config { path: reported, .. })) => {
                assert_eq!(reported, path);
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn dry_run_writes_scripts_and_lists_commands() {
        let dir = tempfile::tempdir().unwrap();
        let script_dir = dir.path().join("scripts");
        let scheduler = SbatchScheduler::new("sbatch");

        let commands =
            dry_run_commands(&SweepConfig::default(), &scheduler, &script_dir, Some(2)).unwrap();

        assert_eq!(commands.len(), 2);
        assert_eq!(std::fs::read_dir(&script_dir).unwrap().count(), 2);
        for command in &commands {
            assert!(command.starts_with("sbatch --job-name=Equilibrium "));
            assert!(command.contains(" --ntasks="));
            assert!(command.ends_with(".sh"));
            let script = command.rsplit(' ').next().unwrap();
            assert!(Path::new(script).starts_with(&script_dir));
            assert!(Path::new(script).exists());
        }
    }

    #[test]
    fn dry_run_rejects_empty_grid() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SweepConfig::default();
        config.grid.graph_names.clear();

        let err = dry_run_commands(&config, &SbatchScheduler::new("sbatch"), dir.path(), None)
            .unwrap_err();
        assert!(matches!(err, CliError::Sweep(SweepError::EmptyAxis { .. })));
    }

    #[test]
    fn collate_requires_tag() {
        assert!(Cli::try_parse_from(["eq-cli", "collate"]).is_err());
    }
}
