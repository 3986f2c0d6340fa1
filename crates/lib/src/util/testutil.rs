//! Test utilities for folio-lib.
//!
//! Helpers for laying out small project trees inside temporary directories.

use std::fs;
use std::path::{Path, PathBuf};

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(&path, content).unwrap();
  path
}

/// Read `root/relative` as a string.
pub fn read_file(root: &Path, relative: &str) -> String {
  fs::read_to_string(root.join(relative)).unwrap_or_else(|e| panic!("failed to read {}: {}", relative, e))
}

/// Write a `folio.json` for a project rooted at `root`.
pub fn write_config(root: &Path, json: &str) {
  write_file(root, crate::consts::CONFIG_FILENAME, json);
}
