//! Output directory preparation.
//!
//! Every build starts from an empty output directory: whatever a previous
//! run left there is removed before anything is written. Because that
//! removal is recursive, the output path is checked first: it may not hold
//! the project itself or overlap a directory the build still needs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::util::fs::normalize_lexically;

#[derive(Debug, Error)]
pub enum WorkspaceError {
  #[error("refusing to use {} as the build directory: it is or contains the project root", path.display())]
  ProjectRoot { path: PathBuf },

  #[error("refusing to use {} as the build directory: it overlaps {}", path.display(), reserved.display())]
  Reserved { path: PathBuf, reserved: PathBuf },

  #[error("failed to remove old build directory {}: {source}", path.display())]
  Remove { path: PathBuf, source: io::Error },

  #[error("unable to create build directory {}: {source}", path.display())]
  Create { path: PathBuf, source: io::Error },
}

/// Remove `output_path` if present and recreate it empty.
///
/// Nothing is deleted when the output is the project root or one of its
/// ancestors, or when it equals, contains or sits inside any `reserved` path.
pub fn prepare_output(project_root: &Path, output_path: &Path, reserved: &[PathBuf]) -> Result<(), WorkspaceError> {
  check_output(project_root, output_path, reserved)?;

  if output_path.exists() {
    info!(path = %output_path.display(), "removing old build directory");
    fs::remove_dir_all(output_path).map_err(|e| WorkspaceError::Remove {
      path: output_path.to_path_buf(),
      source: e,
    })?;
  }

  fs::create_dir_all(output_path).map_err(|e| WorkspaceError::Create {
    path: output_path.to_path_buf(),
    source: e,
  })?;
  info!(path = %output_path.display(), "created build directory");

  Ok(())
}

fn check_output(project_root: &Path, output_path: &Path, reserved: &[PathBuf]) -> Result<(), WorkspaceError> {
  let output = resolve(output_path);

  if resolve(project_root).starts_with(&output) {
    return Err(WorkspaceError::ProjectRoot {
      path: output_path.to_path_buf(),
    });
  }

  for path in reserved {
    let resolved = resolve(path);
    if output.starts_with(&resolved) || resolved.starts_with(&output) {
      return Err(WorkspaceError::Reserved {
        path: output_path.to_path_buf(),
        reserved: path.clone(),
      });
    }
  }

  Ok(())
}

/// Canonical form of `path`, which need not exist yet.
///
/// The nearest existing ancestor is canonicalized and the missing tail is
/// appended with `.` and `..` resolved lexically.
fn resolve(path: &Path) -> PathBuf {
  let path = if path.is_absolute() {
    path.to_path_buf()
  } else {
    std::env::current_dir().map(|cwd| cwd.join(path)).unwrap_or_else(|_| path.to_path_buf())
  };

  let mut existing = path.as_path();
  let mut tail = Vec::new();
  loop {
    if let Ok(canonical) = dunce::canonicalize(existing) {
      let mut resolved = canonical;
      for component in tail.iter().rev() {
        resolved.push(component);
      }
      return normalize_lexically(&resolved);
    }
    match (existing.parent(), existing.file_name()) {
      (Some(parent), Some(name)) => {
        tail.push(name.to_os_string());
        existing = parent;
      }
      // Ends in `..` or `.`, or reached the filesystem root.
      _ => {
        let lexical = normalize_lexically(&path);
        return if lexical != path { resolve(&lexical) } else { lexical };
      }
    }
  }
}
