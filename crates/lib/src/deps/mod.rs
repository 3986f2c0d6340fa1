//! Baseline runtime dependencies for the active workspace.
//!
//! A workspace without a `package.json` gets the default one, and a
//! workspace without `node_modules/` gets the embedded runtime modules.
//! Anything the user already manages is left exactly as it is.

mod templates;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::consts::{NODE_MODULES_DIR, PACKAGE_JSON};

pub use templates::{NODE_MODULES, PACKAGE_JSON_TEMPLATE};

#[derive(Debug, Error)]
pub enum DepsError {
  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: io::Error },
}

/// Which defaults [`prime`] had to write.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PrimeResult {
  pub wrote_package_json: bool,
  pub seeded_node_modules: bool,
}

/// Write default dependencies into `workspace` where they are missing.
pub fn prime(workspace: &Path) -> Result<PrimeResult, DepsError> {
  let mut result = PrimeResult::default();

  let package_json = workspace.join(PACKAGE_JSON);
  if !package_json.exists() {
    write(&package_json, PACKAGE_JSON_TEMPLATE)?;
    result.wrote_package_json = true;
  }

  let node_modules = workspace.join(NODE_MODULES_DIR);
  if !node_modules.exists() {
    for (relative, contents) in NODE_MODULES {
      write(&node_modules.join(relative), contents)?;
    }
    result.seeded_node_modules = true;
    info!(path = %node_modules.display(), "added default runtime dependencies");
  } else {
    debug!(path = %node_modules.display(), "node_modules present, leaving as is");
  }

  Ok(result)
}

fn write(path: &Path, contents: &str) -> Result<(), DepsError> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).map_err(|e| DepsError::CreateDir {
      path: parent.to_path_buf(),
      source: e,
    })?;
  }
  fs::write(path, contents).map_err(|e| DepsError::WriteFile {
    path: path.to_path_buf(),
    source: e,
  })
}
