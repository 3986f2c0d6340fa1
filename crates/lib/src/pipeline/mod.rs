//! The build pipeline.
//!
//! A build runs its stages strictly in order, each one reading and filling in
//! the shared [`BuildContext`]:
//!
//! 1. resolve the build directory from config and overrides
//! 2. compose the theme workspace (themed projects only)
//! 3. prepare an empty output directory
//! 4. prime runtime dependencies in the active workspace
//! 5. eject scaffold files and copy the ones that need no compilation
//! 6. stage static assets
//! 7. build with exactly one strategy, native or external
//! 8. bundle the output
//! 9. clean up either the theme workspace or the newly ejected files
//!
//! The first failing stage aborts the build. Nothing is rolled back; a failed
//! build leaves whatever it produced so far in place.

pub mod guard;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::{debug, info};

use crate::cleanup::{CleanupBranch, cleanup};
use crate::config::{BuildOverrides, SiteConfig, resolve_build_dir};
use crate::consts::{TEMP_BUILD_DIR, THEMES_DIR};
use crate::context::{BuildContext, BuildStrategy};
use crate::eject::ejected_root;
use crate::theme::theme_path;
use crate::toolchain::{LocalToolchain, Toolchain, ToolchainError};
use crate::workspace::{WorkspaceError, prepare_output};

/// A step of the pipeline, used for error attribution and timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
  Resolve,
  Theme,
  Workspace,
  Dependencies,
  Eject,
  Assets,
  Build,
  Bundle,
  Cleanup,
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Stage::Resolve => "resolve",
      Stage::Theme => "theme",
      Stage::Workspace => "workspace",
      Stage::Dependencies => "dependencies",
      Stage::Eject => "eject",
      Stage::Assets => "assets",
      Stage::Build => "build",
      Stage::Bundle => "bundle",
      Stage::Cleanup => "cleanup",
    };
    write!(f, "{}", name)
  }
}

#[derive(Debug, Error)]
pub enum BuildError {
  #[error("{stage} stage failed: {source}")]
  Stage { stage: Stage, source: ToolchainError },

  #[error(transparent)]
  Workspace(#[from] WorkspaceError),

  /// A panic caught by [`guard::guarded`].
  #[error("unexpected failure, is this a valid folio project? {0}")]
  Unexpected(String),
}

impl BuildError {
  fn at(stage: Stage) -> impl FnOnce(ToolchainError) -> BuildError {
    move |source| BuildError::Stage { stage, source }
  }
}

/// Wall-clock time spent in one stage.
#[derive(Debug, Clone, Serialize)]
pub struct StageTiming {
  pub stage: Stage,
  #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
  pub elapsed: Duration,
}

fn as_millis<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
  s.serialize_f64(d.as_secs_f64() * 1000.0)
}

/// Summary of a successful build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
  pub output_path: PathBuf,
  pub strategy: BuildStrategy,
  /// Theme the build was layered over, if any.
  pub theme: Option<String>,
  /// Number of scaffold files this run ejected.
  pub ejected: usize,
  pub cleanup: CleanupBranch,
  /// Per-stage timings, only collected when benchmarking.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub timings: Vec<StageTiming>,
}

struct Stopwatch {
  enabled: bool,
  timings: Vec<StageTiming>,
}

impl Stopwatch {
  fn new(enabled: bool) -> Self {
    Self {
      enabled,
      timings: Vec::new(),
    }
  }

  fn time<T>(&mut self, stage: Stage, f: impl FnOnce() -> T) -> T {
    if !self.enabled {
      return f();
    }
    let start = Instant::now();
    let out = f();
    let elapsed = start.elapsed();
    debug!(%stage, elapsed_ms = elapsed.as_millis() as u64, "stage finished");
    self.timings.push(StageTiming { stage, elapsed });
    out
  }
}

/// Build the project at `project_root` with the default toolchain.
///
/// This is the top-level entry point: config is loaded here (falling back to
/// defaults if `folio.json` cannot be read) and any panic during the build is
/// reported as [`BuildError::Unexpected`].
pub fn run(project_root: &Path, overrides: &BuildOverrides) -> Result<BuildReport, BuildError> {
  guard::guarded(|| {
    let config = SiteConfig::load_or_default(project_root);
    let toolchain = LocalToolchain::new(project_root, &config);
    build(project_root, &config, overrides, &toolchain)
  })
  .unwrap_or_else(|message| Err(BuildError::Unexpected(message)))
}

/// Run every stage against `toolchain`.
pub fn build(
  project_root: &Path,
  config: &SiteConfig,
  overrides: &BuildOverrides,
  toolchain: &dyn Toolchain,
) -> Result<BuildReport, BuildError> {
  let mut watch = Stopwatch::new(overrides.benchmark);

  let mut ctx = watch.time(Stage::Resolve, || resolve(project_root, config, overrides));
  info!(output = %ctx.output_path.display(), strategy = %ctx.strategy, "starting build");

  watch.time(Stage::Theme, || compose_theme(&mut ctx, config, toolchain))?;
  watch.time(Stage::Workspace, || prepare_workspace(&ctx))?;
  watch.time(Stage::Dependencies, || prime_dependencies(&ctx, toolchain))?;
  watch.time(Stage::Eject, || eject_scaffold(&mut ctx, toolchain))?;
  watch.time(Stage::Assets, || stage_assets(&ctx, toolchain))?;
  watch.time(Stage::Build, || run_strategy(&ctx, config, toolchain))?;
  watch.time(Stage::Bundle, || bundle(&ctx, toolchain));
  let branch = watch.time(Stage::Cleanup, || cleanup(&ctx, toolchain).map_err(BuildError::at(Stage::Cleanup)))?;

  info!(output = %ctx.output_path.display(), "build complete");

  Ok(BuildReport {
    output_path: ctx.output_path,
    strategy: ctx.strategy,
    theme: (!config.theme.is_empty()).then(|| config.theme.clone()),
    ejected: ctx.ejected_created.len(),
    cleanup: branch,
    timings: watch.timings,
  })
}

/// Create the context for this run from config and flags.
pub fn resolve(project_root: &Path, config: &SiteConfig, overrides: &BuildOverrides) -> BuildContext {
  let build_dir = resolve_build_dir(&config.build_dir, overrides.build_dir.as_deref());
  debug!(build_dir = %build_dir, "resolved build directory");
  BuildContext::new(project_root, build_dir, BuildStrategy::from_flag(overrides.external))
}

/// Stage the configured theme and merge the project over it.
///
/// Leaves `ctx.temp_build_dir` unset when the project has no theme.
pub fn compose_theme(ctx: &mut BuildContext, config: &SiteConfig, toolchain: &dyn Toolchain) -> Result<(), BuildError> {
  if config.theme.is_empty() {
    debug!("no theme configured");
    return Ok(());
  }

  let options = config.theme_options(&config.theme);
  let workspace = toolchain
    .theme_copy(&theme_path(&config.theme), &options)
    .map_err(BuildError::at(Stage::Theme))?;
  debug!(theme = %config.theme, workspace = %workspace.display(), "theme copied, merging project");

  toolchain
    .theme_merge(&workspace, &ctx.build_dir)
    .map_err(BuildError::at(Stage::Theme))?;
  ctx.temp_build_dir = Some(workspace);
  Ok(())
}

/// Empty the output directory.
///
/// The theme workspace, installed themes and both possible ejected roots are
/// still needed by later stages, so the output may not overlap any of them.
pub fn prepare_workspace(ctx: &BuildContext) -> Result<(), BuildError> {
  let reserved = [
    ctx.project_root.join(TEMP_BUILD_DIR),
    ctx.project_root.join(THEMES_DIR),
    ejected_root(&ctx.project_root),
    ejected_root(ctx.active_workspace()),
  ];
  Ok(prepare_output(&ctx.project_root, &ctx.output_path, &reserved)?)
}

pub fn prime_dependencies(ctx: &BuildContext, toolchain: &dyn Toolchain) -> Result<(), BuildError> {
  toolchain
    .dependency_prime(ctx.active_workspace())
    .map_err(BuildError::at(Stage::Dependencies))
}

/// Eject scaffold files and copy the non-compiled ones to the output.
pub fn eject_scaffold(ctx: &mut BuildContext, toolchain: &dyn Toolchain) -> Result<(), BuildError> {
  let ejected = toolchain
    .scaffold_eject(ctx.active_workspace())
    .map_err(BuildError::at(Stage::Eject))?;
  debug!(created = ejected.created.len(), root = %ejected.root.display(), "ejected scaffold");

  toolchain
    .scaffold_copy_non_compiled(&ctx.output_path, ctx.active_workspace(), &ejected.root)
    .map_err(BuildError::at(Stage::Eject))?;

  ctx.ejected_root = Some(ejected.root);
  ctx.ejected_created = ejected.created;
  Ok(())
}

pub fn stage_assets(ctx: &BuildContext, toolchain: &dyn Toolchain) -> Result<(), BuildError> {
  toolchain
    .asset_copy(&ctx.output_path, ctx.active_workspace())
    .map_err(BuildError::at(Stage::Assets))
}

/// Build the client and content with the strategy in `ctx`. Only that
/// strategy's capabilities are called.
pub fn run_strategy(ctx: &BuildContext, config: &SiteConfig, toolchain: &dyn Toolchain) -> Result<(), BuildError> {
  let output = &ctx.output_path;
  let workspace = ctx.active_workspace();

  match ctx.strategy {
    BuildStrategy::External => {
      let client = toolchain.external_client_script(output, workspace);
      let (data_source, content) = toolchain
        .external_data_source_script(output, config, workspace)
        .map_err(BuildError::at(Stage::Build))?;
      toolchain
        .external_exec(&client, &data_source, &content)
        .map_err(BuildError::at(Stage::Build))
    }
    BuildStrategy::Native => {
      let root = ctx.ejected_root.clone().unwrap_or_else(|| ejected_root(workspace));
      toolchain
        .native_client_build(output, workspace, &root)
        .map_err(BuildError::at(Stage::Build))?;
      toolchain
        .native_data_source_build(output, config, workspace)
        .map_err(BuildError::at(Stage::Build))
    }
  }
}

pub fn bundle(ctx: &BuildContext, toolchain: &dyn Toolchain) {
  toolchain.bundle(&ctx.output_path);
}
