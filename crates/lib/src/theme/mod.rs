//! Theme staging.
//!
//! A project that names a theme is built from a temporary workspace: the
//! theme tree is copied there first (after any theme it extends), then the
//! project's own files are copied over it so the project wins every conflict.
//!
//! ```text
//! <project>/themes/<name>/themes/<parent>/   ← copied first
//! <project>/themes/<name>/                   ← copied over the parent
//! <project>/                                 ← merged last
//!            ↓
//! <project>/.folio-build/
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, SiteConfig, ThemeOptions};
use crate::consts::{MERGE_IGNORED, TEMP_BUILD_DIR, THEMES_DIR};
use crate::util::fs::{CopyError, copy_tree, normalize_lexically};

/// Errors that can occur while staging or removing a theme workspace.
#[derive(Debug, Error)]
pub enum ThemeError {
  #[error("theme not found: {}", path.display())]
  NotFound { path: PathBuf },

  #[error("theme {} extends itself through {}", path.display(), chain.join(" -> "))]
  Cycle { path: PathBuf, chain: Vec<String> },

  #[error("invalid theme config: {0}")]
  Config(#[source] ConfigError),

  #[error("failed to reset theme workspace {}: {source}", path.display())]
  Reset { path: PathBuf, source: io::Error },

  #[error("failed to remove theme workspace {}: {source}", path.display())]
  Remove { path: PathBuf, source: io::Error },

  #[error(transparent)]
  Copy(#[from] CopyError),
}

/// Relative path of a named theme inside a project or theme root.
pub fn theme_path(name: &str) -> PathBuf {
  Path::new(THEMES_DIR).join(name)
}

/// Stage the theme at `theme_path` (relative to `project_root`) into a fresh workspace.
///
/// Returns the workspace path. A stale workspace from an earlier run is
/// removed first.
pub fn copy_theme(project_root: &Path, theme_path: &Path, options: &ThemeOptions) -> Result<PathBuf, ThemeError> {
  let workspace = project_root.join(TEMP_BUILD_DIR);

  if workspace.exists() {
    debug!(path = %workspace.display(), "removing stale theme workspace");
    fs::remove_dir_all(&workspace).map_err(|e| ThemeError::Reset {
      path: workspace.clone(),
      source: e,
    })?;
  }
  fs::create_dir_all(&workspace).map_err(|e| ThemeError::Reset {
    path: workspace.clone(),
    source: e,
  })?;

  let mut chain = Vec::new();
  stage_theme(&project_root.join(theme_path), options, &workspace, &mut chain)?;

  info!(theme = %theme_path.display(), workspace = %workspace.display(), "staged theme");
  Ok(workspace)
}

fn stage_theme(
  theme_dir: &Path,
  options: &ThemeOptions,
  workspace: &Path,
  chain: &mut Vec<PathBuf>,
) -> Result<(), ThemeError> {
  if !theme_dir.is_dir() {
    return Err(ThemeError::NotFound {
      path: theme_dir.to_path_buf(),
    });
  }

  let canonical = dunce::canonicalize(theme_dir).unwrap_or_else(|_| theme_dir.to_path_buf());
  if chain.contains(&canonical) {
    return Err(ThemeError::Cycle {
      path: theme_dir.to_path_buf(),
      chain: chain.iter().map(|p| p.display().to_string()).collect(),
    });
  }
  chain.push(canonical);

  // A theme may itself sit on top of another theme.
  let nested = match SiteConfig::load(theme_dir) {
    Ok(config) => Some(config),
    Err(ConfigError::NotFound { .. }) => None,
    Err(e) => return Err(ThemeError::Config(e)),
  };
  if let Some(nested) = nested.filter(|c| !c.theme.is_empty()) {
    debug!(theme = %theme_dir.display(), parent = %nested.theme, "staging parent theme");
    let parent_options = nested.theme_options(&nested.theme);
    stage_theme(&theme_dir.join(theme_path(&nested.theme)), &parent_options, workspace, chain)?;
  }

  let copied = copy_tree(theme_dir, workspace, |rel| {
    rel.starts_with(THEMES_DIR) || rel.starts_with(".git") || is_excluded(rel, &options.exclude)
  })?;
  debug!(theme = %theme_dir.display(), files = copied, "copied theme files");

  Ok(())
}

fn is_excluded(rel: &Path, exclude: &[String]) -> bool {
  exclude
    .iter()
    .map(|e| e.trim_matches('/'))
    .filter(|e| !e.is_empty())
    .any(|e| rel.starts_with(e))
}

/// Copy the project's own files over the staged theme workspace.
///
/// Installed themes, the build output, the workspace itself, `.git` and
/// `node_modules` are left behind.
pub fn merge_project(project_root: &Path, workspace: &Path, build_dir: &str) -> Result<(), ThemeError> {
  let output = output_in_project(project_root, build_dir);
  let copied = copy_tree(project_root, workspace, |rel| {
    MERGE_IGNORED.iter().any(|ignored| rel.starts_with(ignored))
      || output.as_deref().is_some_and(|out| rel.starts_with(out))
  })?;

  debug!(files = copied, workspace = %workspace.display(), "merged project over theme");
  Ok(())
}

/// `build_dir` relative to `project_root`, or `None` when it lies outside the project.
fn output_in_project(project_root: &Path, build_dir: &str) -> Option<PathBuf> {
  let normalized = normalize_lexically(Path::new(build_dir));
  let rel = if normalized.is_absolute() {
    normalized.strip_prefix(normalize_lexically(project_root)).ok()?.to_path_buf()
  } else {
    normalized
  };
  (!rel.as_os_str().is_empty() && !rel.starts_with("..")).then_some(rel)
}

/// Remove a staged theme workspace and everything in it.
pub fn clean_theme(workspace: &Path) -> Result<(), ThemeError> {
  fs::remove_dir_all(workspace).map_err(|e| ThemeError::Remove {
    path: workspace.to_path_buf(),
    source: e,
  })?;
  debug!(path = %workspace.display(), "removed theme workspace");
  Ok(())
}
