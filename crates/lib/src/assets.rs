//! Static asset staging.

use std::path::Path;

use tracing::debug;

use crate::consts::ASSETS_DIR;
use crate::util::fs::{CopyError, copy_tree};

/// Copy `<workspace>/assets/` verbatim to `<output>/assets/`.
///
/// Returns the number of files copied; a workspace without assets copies none.
pub fn stage(output: &Path, workspace: &Path) -> Result<usize, CopyError> {
  let src = workspace.join(ASSETS_DIR);
  if !src.is_dir() {
    debug!(path = %src.display(), "no assets directory");
    return Ok(0);
  }

  let copied = copy_tree(&src, &output.join(ASSETS_DIR), |_| false)?;
  debug!(files = copied, "copied static assets");
  Ok(copied)
}
