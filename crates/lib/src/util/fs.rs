//! Recursive filesystem helpers.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::trace;
use walkdir::WalkDir;

/// Errors from copying a directory tree.
#[derive(Debug, Error)]
pub enum CopyError {
  #[error("failed to walk {}: {source}", path.display())]
  Walk { path: PathBuf, source: walkdir::Error },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
  CopyFile { from: PathBuf, to: PathBuf, source: io::Error },
}

/// Copy everything under `src` into `dst`, overwriting files already there.
///
/// `skip` is called with each entry's path relative to `src`; a skipped
/// directory is not descended into. Returns the number of files copied.
pub fn copy_tree<F>(src: &Path, dst: &Path, skip: F) -> Result<usize, CopyError>
where
  F: Fn(&Path) -> bool,
{
  let mut copied = 0;

  let walker = WalkDir::new(src)
    .follow_links(true)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|e| match e.path().strip_prefix(src) {
      Ok(rel) if !rel.as_os_str().is_empty() => !skip(rel),
      _ => true,
    });

  for entry in walker {
    let entry = entry.map_err(|e| CopyError::Walk {
      path: src.to_path_buf(),
      source: e,
    })?;
    let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
    let target = dst.join(rel);

    if entry.file_type().is_dir() {
      fs::create_dir_all(&target).map_err(|e| CopyError::CreateDir {
        path: target.clone(),
        source: e,
      })?;
      continue;
    }

    if let Some(parent) = target.parent() {
      fs::create_dir_all(parent).map_err(|e| CopyError::CreateDir {
        path: parent.to_path_buf(),
        source: e,
      })?;
    }
    fs::copy(entry.path(), &target).map_err(|e| CopyError::CopyFile {
      from: entry.path().to_path_buf(),
      to: target.clone(),
      source: e,
    })?;
    trace!(path = %rel.display(), "copied");
    copied += 1;
  }

  Ok(copied)
}

/// All regular files under `root`, relative to it and sorted.
pub fn relative_files(root: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
  let mut files = Vec::new();
  for entry in WalkDir::new(root).sort_by_file_name() {
    let entry = entry?;
    if entry.file_type().is_file() {
      files.push(entry.path().strip_prefix(root).unwrap_or(entry.path()).to_path_buf());
    }
  }
  Ok(files)
}

/// Remove the now-empty parent directories of `removed`, up to and including `root`.
///
/// Only ancestors of the given paths are considered, so empty directories
/// elsewhere under `root` are left alone.
pub fn prune_empty_parents(removed: &[PathBuf], root: &Path) -> io::Result<()> {
  for path in removed {
    let mut dir = path.parent();
    while let Some(current) = dir {
      if !current.starts_with(root) {
        break;
      }
      match fs::read_dir(current) {
        Ok(mut entries) => {
          if entries.next().is_some() {
            break;
          }
          fs::remove_dir(current)?;
        }
        // Already removed while pruning an earlier path.
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
      }
      dir = current.parent();
    }
  }

  Ok(())
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// A `..` with nothing left to pop is kept, so a relative path that climbs
/// out of its base still starts with `..`.
pub fn normalize_lexically(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        let popped = matches!(out.components().next_back(), Some(Component::Normal(_))) && out.pop();
        if !popped && !out.has_root() {
          out.push("..");
        }
      }
      other => out.push(other.as_os_str()),
    }
  }
  out
}
