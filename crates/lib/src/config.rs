//! Project configuration and build overrides.
//!
//! A project's settings live in `folio.json` at its root. Command-line flags
//! arrive as [`BuildOverrides`], an immutable value built once and handed to
//! the pipeline; an override always beats the persisted value it shadows.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::consts::{CONFIG_FILENAME, DEFAULT_BUILD_DIR};

/// Errors that can occur while loading `folio.json`.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("config file not found: {}", path.display())]
  NotFound { path: PathBuf },

  #[error("failed to read config {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to parse config {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_json::Error },
}

/// Options for a single theme, keyed by theme name in [`SiteConfig::theme_config`].
///
/// Only `exclude` changes how the theme is staged. Every other key is carried
/// through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeOptions {
  /// Where the theme was installed from.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
  /// Pinned revision of the theme source.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub commit: Option<String>,
  /// Theme-relative paths left out when staging the theme.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub exclude: Vec<String>,
  #[serde(flatten)]
  pub extra: BTreeMap<String, serde_json::Value>,
}

/// Persisted project settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
  /// Name of the build output directory, relative to the project root.
  pub build_dir: String,
  /// Selected theme, empty when the project has none.
  pub theme: String,
  /// Options per theme name. Nested themes look up their own entry here.
  pub theme_config: BTreeMap<String, ThemeOptions>,
  /// Executable used by the external build strategy.
  pub runtime: String,
  /// URL pattern per content type, e.g. `"blog": "/posts/:filename"`.
  pub routes: BTreeMap<String, String>,
}

impl Default for SiteConfig {
  fn default() -> Self {
    Self {
      build_dir: DEFAULT_BUILD_DIR.to_string(),
      theme: String::new(),
      theme_config: BTreeMap::new(),
      runtime: "node".to_string(),
      routes: BTreeMap::new(),
    }
  }
}

impl SiteConfig {
  /// Path of the config file for a project rooted at `dir`.
  pub fn path_in(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILENAME)
  }

  /// Read `folio.json` from `dir`.
  pub fn load(dir: &Path) -> Result<Self, ConfigError> {
    let path = Self::path_in(dir);

    let content = fs::read_to_string(&path).map_err(|e| {
      if e.kind() == io::ErrorKind::NotFound {
        ConfigError::NotFound { path: path.clone() }
      } else {
        ConfigError::Read {
          path: path.clone(),
          source: e,
        }
      }
    })?;

    let config = serde_json::from_str(&content).map_err(|e| ConfigError::Parse { path, source: e })?;
    debug!(dir = %dir.display(), "loaded site config");
    Ok(config)
  }

  /// Read `folio.json` from `dir`, falling back to defaults when it cannot be loaded.
  pub fn load_or_default(dir: &Path) -> Self {
    match Self::load(dir) {
      Ok(config) => config,
      Err(e) => {
        warn!(error = %e, "using default site config");
        Self::default()
      }
    }
  }

  /// Options for `theme`, or defaults when the config has no entry for it.
  pub fn theme_options(&self, theme: &str) -> ThemeOptions {
    self.theme_config.get(theme).cloned().unwrap_or_default()
  }
}

/// Flags supplied for a single build invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOverrides {
  /// Replaces [`SiteConfig::build_dir`] when non-empty.
  pub build_dir: Option<String>,
  pub verbose: bool,
  pub benchmark: bool,
  /// Delegate the build to the external script runtime.
  pub external: bool,
}

/// Pick the effective build directory name.
///
/// A non-empty override wins; anything else leaves the persisted value alone.
pub fn resolve_build_dir(persisted: &str, override_dir: Option<&str>) -> String {
  match override_dir {
    Some(dir) if !dir.is_empty() => dir.to_string(),
    _ => persisted.to_string(),
  }
}
