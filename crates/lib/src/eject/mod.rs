//! Ejectable scaffold files.
//!
//! folio's client runtime ships inside the binary. Before each build the
//! files are written to `<workspace>/ejected/` so the build can read them and
//! so users can customize them: a file that already exists there is the
//! user's and is never overwritten. Only files this run created are recorded,
//! and only those are removed again by [`clean`].

mod templates;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::consts::{EJECTED_DIR, SPA_DIR};
use crate::util::fs::prune_empty_parents;

pub use templates::SCAFFOLD_FILES;

#[derive(Debug, Error)]
pub enum EjectError {
  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: io::Error },

  #[error("failed to read ejected files under {}: {source}", path.display())]
  Walk { path: PathBuf, source: walkdir::Error },

  #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
  CopyFile { from: PathBuf, to: PathBuf, source: io::Error },

  #[error("failed to remove {}: {source}", path.display())]
  Remove { path: PathBuf, source: io::Error },
}

/// Whether a scaffold file is served as-is or consumed by the client build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaffoldKind {
  /// Plain ES module, copied straight to the output.
  Module,
  /// Input to the client build, never copied verbatim.
  Component,
}

/// An ejectable core file.
#[derive(Debug)]
pub struct ScaffoldFile {
  /// Path relative to the ejected root.
  pub path: &'static str,
  pub contents: &'static str,
  pub kind: ScaffoldKind,
}

/// Outcome of [`eject`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EjectResult {
  /// `<workspace>/ejected`.
  pub root: PathBuf,
  /// Files written by this call, absolute.
  pub created: Vec<PathBuf>,
}

/// Where scaffold files are ejected for a given workspace.
pub fn ejected_root(workspace: &Path) -> PathBuf {
  workspace.join(EJECTED_DIR)
}

/// Write every scaffold file missing from `workspace`.
pub fn eject(workspace: &Path) -> Result<EjectResult, EjectError> {
  let root = ejected_root(workspace);
  let mut created = Vec::new();

  for file in SCAFFOLD_FILES {
    let path = root.join(file.path);
    if path.exists() {
      debug!(path = %path.display(), "keeping ejected file");
      continue;
    }

    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).map_err(|e| EjectError::CreateDir {
        path: parent.to_path_buf(),
        source: e,
      })?;
    }
    fs::write(&path, file.contents).map_err(|e| EjectError::WriteFile {
      path: path.clone(),
      source: e,
    })?;
    created.push(path);
  }

  debug!(root = %root.display(), created = created.len(), "ejected scaffold files");
  Ok(EjectResult { root, created })
}

/// Copy the ejected ES modules to `<output>/spa/ejected/`.
///
/// Every `.js` file under `root` is served as-is, including modules the user
/// added next to the scaffold. Components are left for the client build.
pub fn copy_non_compiled(output: &Path, workspace: &Path, root: &Path) -> Result<usize, EjectError> {
  let dest = output.join(SPA_DIR).join(EJECTED_DIR);
  let mut copied = 0;

  for entry in WalkDir::new(root).sort_by_file_name() {
    let entry = entry.map_err(|e| EjectError::Walk {
      path: root.to_path_buf(),
      source: e,
    })?;
    if !entry.file_type().is_file() || entry.path().extension().is_none_or(|ext| ext != "js") {
      continue;
    }

    let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
    let target = dest.join(rel);
    if let Some(parent) = target.parent() {
      fs::create_dir_all(parent).map_err(|e| EjectError::CreateDir {
        path: parent.to_path_buf(),
        source: e,
      })?;
    }
    fs::copy(entry.path(), &target).map_err(|e| EjectError::CopyFile {
      from: entry.path().to_path_buf(),
      to: target.clone(),
      source: e,
    })?;
    copied += 1;
  }

  debug!(workspace = %workspace.display(), files = copied, "copied ejected modules");
  Ok(copied)
}

/// Remove the files [`eject`] created, then the directories that removal left empty.
///
/// A created file that is already gone is not an error.
pub fn clean(created: &[PathBuf], root: &Path) -> Result<(), EjectError> {
  for path in created {
    match fs::remove_file(path) {
      Ok(()) => debug!(path = %path.display(), "removed ejected file"),
      Err(e) if e.kind() == io::ErrorKind::NotFound => {}
      Err(e) => {
        return Err(EjectError::Remove {
          path: path.clone(),
          source: e,
        });
      }
    }
  }

  prune_empty_parents(created, root).map_err(|e| EjectError::Remove {
    path: root.to_path_buf(),
    source: e,
  })?;

  info!(removed = created.len(), "cleaned up ejected files");
  Ok(())
}
