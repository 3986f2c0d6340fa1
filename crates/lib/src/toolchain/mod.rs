//! Collaborators the build pipeline delegates to.
//!
//! The pipeline decides what runs and in which order; everything that
//! actually touches theme trees, scaffold files, assets or a compiler sits
//! behind [`Toolchain`]. [`LocalToolchain`] is the implementation the CLI
//! uses.

mod local;
#[cfg(test)]
pub mod recording;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{SiteConfig, ThemeOptions};
use crate::deps::DepsError;
use crate::eject::{EjectError, EjectResult};
use crate::external::ExternalError;
use crate::native::NativeError;
use crate::theme::ThemeError;
use crate::util::fs::CopyError;

pub use local::LocalToolchain;

/// Errors returned by a [`Toolchain`] capability.
#[derive(Debug, Error)]
pub enum ToolchainError {
  #[error(transparent)]
  Theme(#[from] ThemeError),

  #[error(transparent)]
  Deps(#[from] DepsError),

  #[error(transparent)]
  Eject(#[from] EjectError),

  #[error(transparent)]
  Assets(#[from] CopyError),

  #[error(transparent)]
  Native(#[from] NativeError),

  #[error(transparent)]
  External(#[from] ExternalError),
}

/// Trait for the capabilities a build consumes.
///
/// Paths are absolute except `theme_path`, which is relative to the project
/// root.
pub trait Toolchain {
  /// Stage a theme (and the themes it extends) into a fresh workspace.
  fn theme_copy(&self, theme_path: &Path, options: &ThemeOptions) -> Result<PathBuf, ToolchainError>;

  /// Copy the project's files over a staged theme workspace.
  fn theme_merge(&self, workspace: &Path, build_dir: &str) -> Result<(), ToolchainError>;

  /// Make sure baseline runtime dependencies exist in the workspace.
  fn dependency_prime(&self, workspace: &Path) -> Result<(), ToolchainError>;

  /// Write missing scaffold files into the workspace.
  fn scaffold_eject(&self, workspace: &Path) -> Result<EjectResult, ToolchainError>;

  /// Copy ejected files that need no compilation into the output.
  fn scaffold_copy_non_compiled(&self, output: &Path, workspace: &Path, ejected_root: &Path)
  -> Result<(), ToolchainError>;

  /// Copy static assets into the output.
  fn asset_copy(&self, output: &Path, workspace: &Path) -> Result<(), ToolchainError>;

  /// Script the external runtime runs to build the client.
  fn external_client_script(&self, output: &Path, workspace: &Path) -> String;

  /// Script the external runtime runs to build the data source, plus the content index it consumes.
  fn external_data_source_script(
    &self,
    output: &Path,
    config: &SiteConfig,
    workspace: &Path,
  ) -> Result<(String, String), ToolchainError>;

  /// Run both scripts in the external runtime.
  fn external_exec(&self, client_script: &str, data_source_script: &str, content: &str) -> Result<(), ToolchainError>;

  /// Build the client app in-process.
  fn native_client_build(&self, output: &Path, workspace: &Path, ejected_root: &Path) -> Result<(), ToolchainError>;

  /// Build the content data source in-process.
  fn native_data_source_build(&self, output: &Path, config: &SiteConfig, workspace: &Path)
  -> Result<(), ToolchainError>;

  /// Post-process module references in the output. Reports its own problems.
  fn bundle(&self, output: &Path);

  /// Remove a staged theme workspace.
  fn theme_cleanup(&self, workspace: &Path) -> Result<(), ToolchainError>;

  /// Remove scaffold files created by this run.
  fn scaffold_cleanup(&self, created: &[PathBuf], ejected_root: &Path) -> Result<(), ToolchainError>;
}
