//! Filesystem-backed toolchain.

use std::path::{Path, PathBuf};

use crate::bundle::Bundler;
use crate::config::{SiteConfig, ThemeOptions};
use crate::consts::TEMP_BUILD_DIR;
use crate::eject::EjectResult;
use crate::{assets, deps, eject, external, native, theme};

use super::{Toolchain, ToolchainError};

/// The toolchain used for real builds.
#[derive(Debug, Clone)]
pub struct LocalToolchain {
  project_root: PathBuf,
  runtime: String,
  bundler: Bundler,
}

impl LocalToolchain {
  pub fn new(project_root: impl Into<PathBuf>, config: &SiteConfig) -> Self {
    let project_root = project_root.into();

    // Modules come from the theme workspace first when one will be staged.
    let mut search_roots = Vec::new();
    if !config.theme.is_empty() {
      search_roots.push(project_root.join(TEMP_BUILD_DIR));
    }
    search_roots.push(project_root.clone());

    Self {
      project_root,
      runtime: config.runtime.clone(),
      bundler: Bundler::new(search_roots),
    }
  }
}

impl Toolchain for LocalToolchain {
  fn theme_copy(&self, theme_path: &Path, options: &ThemeOptions) -> Result<PathBuf, ToolchainError> {
    Ok(theme::copy_theme(&self.project_root, theme_path, options)?)
  }

  fn theme_merge(&self, workspace: &Path, build_dir: &str) -> Result<(), ToolchainError> {
    Ok(theme::merge_project(&self.project_root, workspace, build_dir)?)
  }

  fn dependency_prime(&self, workspace: &Path) -> Result<(), ToolchainError> {
    deps::prime(workspace)?;
    Ok(())
  }

  fn scaffold_eject(&self, workspace: &Path) -> Result<EjectResult, ToolchainError> {
    Ok(eject::eject(workspace)?)
  }

  fn scaffold_copy_non_compiled(
    &self,
    output: &Path,
    workspace: &Path,
    ejected_root: &Path,
  ) -> Result<(), ToolchainError> {
    eject::copy_non_compiled(output, workspace, ejected_root)?;
    Ok(())
  }

  fn asset_copy(&self, output: &Path, workspace: &Path) -> Result<(), ToolchainError> {
    assets::stage(output, workspace)?;
    Ok(())
  }

  fn external_client_script(&self, output: &Path, workspace: &Path) -> String {
    external::client_script(output, workspace)
  }

  fn external_data_source_script(
    &self,
    output: &Path,
    config: &SiteConfig,
    workspace: &Path,
  ) -> Result<(String, String), ToolchainError> {
    Ok(external::data_source_script(output, config, workspace)?)
  }

  fn external_exec(&self, client_script: &str, data_source_script: &str, content: &str) -> Result<(), ToolchainError> {
    Ok(external::exec_blocking(
      &self.runtime,
      client_script,
      data_source_script,
      content,
    )?)
  }

  fn native_client_build(&self, output: &Path, workspace: &Path, ejected_root: &Path) -> Result<(), ToolchainError> {
    Ok(native::build_client(output, workspace, ejected_root)?)
  }

  fn native_data_source_build(
    &self,
    output: &Path,
    config: &SiteConfig,
    workspace: &Path,
  ) -> Result<(), ToolchainError> {
    native::build_data_source(output, config, workspace)?;
    Ok(())
  }

  fn bundle(&self, output: &Path) {
    self.bundler.bundle(output);
  }

  fn theme_cleanup(&self, workspace: &Path) -> Result<(), ToolchainError> {
    Ok(theme::clean_theme(workspace)?)
  }

  fn scaffold_cleanup(&self, created: &[PathBuf], ejected_root: &Path) -> Result<(), ToolchainError> {
    Ok(eject::clean(created, ejected_root)?)
  }
}
