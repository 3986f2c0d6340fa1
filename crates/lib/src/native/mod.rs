//! In-process build strategy.
//!
//! The client build lays out the single-page app under `<output>/spa/` and
//! writes the `index.html` shell; the data-source build turns the workspace's
//! content into the index the client loads.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::config::SiteConfig;
use crate::consts::{LAYOUTS_DIR, SPA_DIR};
use crate::content::{self, ContentError};
use crate::util::fs::{CopyError, copy_tree};

/// Name of the ejected app shell the client build renders from.
pub const SHELL_FILE: &str = "shell.html";

#[derive(Debug, Error)]
pub enum NativeError {
  #[error("failed to read app shell {}: {source}", path.display())]
  ReadShell { path: PathBuf, source: io::Error },

  #[error("failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },

  #[error(transparent)]
  Copy(#[from] CopyError),

  #[error(transparent)]
  Content(#[from] ContentError),
}

/// Build the client app into `output`.
///
/// Layout sources from the workspace are placed under `<output>/spa/layouts/`
/// and the ejected shell becomes `<output>/index.html`.
pub fn build_client(output: &Path, workspace: &Path, ejected_root: &Path) -> Result<(), NativeError> {
  let layouts = workspace.join(LAYOUTS_DIR);
  let mut components = 0;
  if layouts.is_dir() {
    components = copy_tree(&layouts, &output.join(SPA_DIR).join(LAYOUTS_DIR), |_| false)?;
  }

  let shell_path = ejected_root.join(SHELL_FILE);
  let shell = fs::read_to_string(&shell_path).map_err(|e| NativeError::ReadShell {
    path: shell_path,
    source: e,
  })?;
  let index = output.join("index.html");
  fs::write(&index, shell).map_err(|e| NativeError::Write { path: index, source: e })?;

  info!(components, "built client app");
  Ok(())
}

/// Build the content index from `<workspace>/content` into `output`.
pub fn build_data_source(output: &Path, config: &SiteConfig, workspace: &Path) -> Result<usize, NativeError> {
  let nodes = content::collect(workspace, &config.routes)?;
  content::write_outputs(output, &nodes)?;
  info!(nodes = nodes.len(), "built content data source");
  Ok(nodes.len())
}
