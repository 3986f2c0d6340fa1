//! End-of-build cleanup.
//!
//! A themed build leaves its whole staged workspace behind, ejected files
//! included, so removing that workspace is all there is to do. An unthemed
//! build ejected straight into the project, and only the files this run
//! created are removed. Exactly one of the two happens.

use serde::Serialize;
use tracing::info;

use crate::context::BuildContext;
use crate::eject::ejected_root;
use crate::toolchain::{Toolchain, ToolchainError};

/// Which cleanup ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupBranch {
  ThemeWorkspace,
  EjectedFiles,
}

pub fn cleanup(ctx: &BuildContext, toolchain: &dyn Toolchain) -> Result<CleanupBranch, ToolchainError> {
  match &ctx.temp_build_dir {
    Some(workspace) => {
      toolchain.theme_cleanup(workspace)?;
      info!(path = %workspace.display(), "removed theme workspace");
      Ok(CleanupBranch::ThemeWorkspace)
    }
    None => {
      let root = ctx
        .ejected_root
        .clone()
        .unwrap_or_else(|| ejected_root(&ctx.project_root));
      toolchain.scaffold_cleanup(&ctx.ejected_created, &root)?;
      info!(files = ctx.ejected_created.len(), "removed ejected scaffold files");
      Ok(CleanupBranch::EjectedFiles)
    }
  }
}
