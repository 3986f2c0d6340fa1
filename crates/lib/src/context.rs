//! Per-run build state.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Which of the two build paths produces the client and content output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStrategy {
  /// In-process client and data-source build.
  Native,
  /// Generated scripts handed to an external script runtime.
  External,
}

impl BuildStrategy {
  pub fn from_flag(external: bool) -> Self {
    if external { Self::External } else { Self::Native }
  }
}

impl fmt::Display for BuildStrategy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildStrategy::Native => write!(f, "native"),
      BuildStrategy::External => write!(f, "external"),
    }
  }
}

/// State threaded through the pipeline, filled in stage by stage.
///
/// `temp_build_dir` is `Some` exactly when a theme is in use, and it alone
/// decides which cleanup branch runs at the end.
#[derive(Debug, Clone)]
pub struct BuildContext {
  /// Directory the build was started from.
  pub project_root: PathBuf,
  /// Effective build directory name after overrides.
  pub build_dir: String,
  /// `project_root/build_dir`.
  pub output_path: PathBuf,
  /// Staged theme workspace, when a theme is configured.
  pub temp_build_dir: Option<PathBuf>,
  /// Root the scaffold files were ejected under.
  pub ejected_root: Option<PathBuf>,
  /// Scaffold files this run wrote that did not exist before it.
  pub ejected_created: Vec<PathBuf>,
  pub strategy: BuildStrategy,
}

impl BuildContext {
  pub fn new(project_root: impl Into<PathBuf>, build_dir: impl Into<String>, strategy: BuildStrategy) -> Self {
    let project_root = project_root.into();
    let build_dir = build_dir.into();
    let output_path = project_root.join(&build_dir);
    Self {
      project_root,
      build_dir,
      output_path,
      temp_build_dir: None,
      ejected_root: None,
      ejected_created: Vec::new(),
      strategy,
    }
  }

  /// The theme workspace if one was staged, otherwise the project root.
  pub fn active_workspace(&self) -> &Path {
    self.temp_build_dir.as_deref().unwrap_or(&self.project_root)
  }

  pub fn uses_theme(&self) -> bool {
    self.temp_build_dir.is_some()
  }
}
