//! Implementation of the `folio build` command.
//!
//! Builds the project in the current directory and prints a summary, plus
//! per-stage timings with `--benchmark`.

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use folio_lib::cleanup::CleanupBranch;
use folio_lib::config::BuildOverrides;
use folio_lib::pipeline::{BuildError, BuildReport, run};

use crate::output::{OutputFormat, print_info, print_json, print_stat, print_success, print_timings, print_warning};

#[derive(Debug, Args)]
pub struct BuildArgs {
  /// Output directory, overriding `build_dir` in folio.json
  #[arg(short, long, value_name = "DIR")]
  pub dir: Option<String>,

  /// Log each build step
  #[arg(short, long)]
  pub verbose: bool,

  /// Report the time spent in each build stage
  #[arg(short, long)]
  pub benchmark: bool,

  /// Build with the external script runtime instead of in-process
  #[arg(short = 'n', long)]
  pub external: bool,

  /// Summary format
  #[arg(short, long, value_enum, default_value_t)]
  pub output: OutputFormat,
}

impl BuildArgs {
  fn overrides(&self) -> BuildOverrides {
    BuildOverrides {
      build_dir: self.dir.clone(),
      verbose: self.verbose,
      benchmark: self.benchmark,
      external: self.external,
    }
  }
}

/// Execute the build command.
///
/// The project root is the current directory. Any build failure, including a
/// panic caught by the pipeline, is returned as an error so the process exits
/// non-zero.
pub fn cmd_build(args: &BuildArgs) -> Result<()> {
  let project_root = std::env::current_dir().context("Failed to determine current directory")?;
  debug!(root = %project_root.display(), dir = ?args.dir, external = args.external, "starting build");

  let report = match run(&project_root, &args.overrides()) {
    Ok(report) => report,
    Err(e) => {
      if matches!(e, BuildError::Unexpected(_)) {
        print_warning("Please create a valid folio project, or run this command from the root of one.");
      }
      return Err(e.into());
    }
  };

  if args.output.is_json() {
    print_json(&report)?;
  } else {
    print_report(&report, args.verbose);
  }

  Ok(())
}

fn print_report(report: &BuildReport, verbose: bool) {
  print_success(&format!("Built site into {}", report.output_path.display()));
  print_stat("Strategy", &report.strategy.to_string());
  print_stat("Theme", report.theme.as_deref().unwrap_or("none"));

  if verbose {
    match report.cleanup {
      CleanupBranch::ThemeWorkspace => print_info("Removed theme workspace"),
      CleanupBranch::EjectedFiles => print_info(&format!("Removed {} ejected scaffold file(s)", report.ejected)),
    }
  }

  if !report.timings.is_empty() {
    let rows: Vec<_> = report.timings.iter().map(|t| (t.stage.to_string(), t.elapsed)).collect();
    print_timings(&rows);
  }
}
