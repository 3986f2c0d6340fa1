//! Toolchain double that records calls instead of touching the filesystem.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::config::{SiteConfig, ThemeOptions};
use crate::eject::EjectResult;
use crate::theme::ThemeError;

use super::{Toolchain, ToolchainError};

/// Every capability call, in order, with the arguments worth asserting on.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
  ThemeCopy { theme_path: PathBuf, options: ThemeOptions },
  ThemeMerge { workspace: PathBuf, build_dir: String },
  DependencyPrime { workspace: PathBuf },
  ScaffoldEject { workspace: PathBuf },
  ScaffoldCopyNonCompiled { output: PathBuf, ejected_root: PathBuf },
  AssetCopy { output: PathBuf, workspace: PathBuf },
  ExternalClientScript,
  ExternalDataSourceScript,
  ExternalExec { client: String, data_source: String, content: String },
  NativeClientBuild,
  NativeDataSourceBuild,
  Bundle { output: PathBuf },
  ThemeCleanup { workspace: PathBuf },
  ScaffoldCleanup { created: Vec<PathBuf>, ejected_root: PathBuf },
}

impl Call {
  pub fn name(&self) -> &'static str {
    match self {
      Call::ThemeCopy { .. } => "theme_copy",
      Call::ThemeMerge { .. } => "theme_merge",
      Call::DependencyPrime { .. } => "dependency_prime",
      Call::ScaffoldEject { .. } => "scaffold_eject",
      Call::ScaffoldCopyNonCompiled { .. } => "scaffold_copy_non_compiled",
      Call::AssetCopy { .. } => "asset_copy",
      Call::ExternalClientScript => "external_client_script",
      Call::ExternalDataSourceScript => "external_data_source_script",
      Call::ExternalExec { .. } => "external_exec",
      Call::NativeClientBuild => "native_client_build",
      Call::NativeDataSourceBuild => "native_data_source_build",
      Call::Bundle { .. } => "bundle",
      Call::ThemeCleanup { .. } => "theme_cleanup",
      Call::ScaffoldCleanup { .. } => "scaffold_cleanup",
    }
  }
}

#[derive(Debug, Default)]
pub struct RecordingToolchain {
  calls: RefCell<Vec<Call>>,
  /// Capability name that returns an error.
  pub fail_on: Option<&'static str>,
  /// Capability name that panics.
  pub panic_on: Option<&'static str>,
  /// Files `scaffold_eject` reports as created, relative to the ejected root.
  pub ejected: Vec<&'static str>,
  /// Workspace `theme_copy` hands back.
  pub theme_workspace: PathBuf,
}

impl RecordingToolchain {
  pub fn new() -> Self {
    Self {
      ejected: vec!["main.js", "router.js", "shell.html"],
      theme_workspace: PathBuf::from("/staged-theme"),
      ..Self::default()
    }
  }

  pub fn calls(&self) -> Vec<Call> {
    self.calls.borrow().clone()
  }

  pub fn names(&self) -> Vec<&'static str> {
    self.calls.borrow().iter().map(Call::name).collect()
  }

  fn record(&self, call: Call) -> Result<(), ToolchainError> {
    let name = call.name();
    self.calls.borrow_mut().push(call);

    if self.panic_on == Some(name) {
      panic!("{} blew up", name);
    }
    if self.fail_on == Some(name) {
      return Err(ToolchainError::Theme(ThemeError::NotFound {
        path: PathBuf::from(name),
      }));
    }
    Ok(())
  }
}

impl Toolchain for RecordingToolchain {
  fn theme_copy(&self, theme_path: &Path, options: &ThemeOptions) -> Result<PathBuf, ToolchainError> {
    self.record(Call::ThemeCopy {
      theme_path: theme_path.to_path_buf(),
      options: options.clone(),
    })?;
    Ok(self.theme_workspace.clone())
  }

  fn theme_merge(&self, workspace: &Path, build_dir: &str) -> Result<(), ToolchainError> {
    self.record(Call::ThemeMerge {
      workspace: workspace.to_path_buf(),
      build_dir: build_dir.to_string(),
    })
  }

  fn dependency_prime(&self, workspace: &Path) -> Result<(), ToolchainError> {
    self.record(Call::DependencyPrime {
      workspace: workspace.to_path_buf(),
    })
  }

  fn scaffold_eject(&self, workspace: &Path) -> Result<EjectResult, ToolchainError> {
    self.record(Call::ScaffoldEject {
      workspace: workspace.to_path_buf(),
    })?;
    let root = workspace.join("ejected");
    Ok(EjectResult {
      created: self.ejected.iter().map(|rel| root.join(rel)).collect(),
      root,
    })
  }

  fn scaffold_copy_non_compiled(
    &self,
    output: &Path,
    _workspace: &Path,
    ejected_root: &Path,
  ) -> Result<(), ToolchainError> {
    self.record(Call::ScaffoldCopyNonCompiled {
      output: output.to_path_buf(),
      ejected_root: ejected_root.to_path_buf(),
    })
  }

  fn asset_copy(&self, output: &Path, workspace: &Path) -> Result<(), ToolchainError> {
    self.record(Call::AssetCopy {
      output: output.to_path_buf(),
      workspace: workspace.to_path_buf(),
    })
  }

  fn external_client_script(&self, output: &Path, _workspace: &Path) -> String {
    // Infallible capability: a configured failure is ignored.
    let _ = self.record(Call::ExternalClientScript);
    format!("client:{}", output.display())
  }

  fn external_data_source_script(
    &self,
    output: &Path,
    _config: &SiteConfig,
    _workspace: &Path,
  ) -> Result<(String, String), ToolchainError> {
    self.record(Call::ExternalDataSourceScript)?;
    Ok((format!("data:{}", output.display()), "[]".to_string()))
  }

  fn external_exec(&self, client_script: &str, data_source_script: &str, content: &str) -> Result<(), ToolchainError> {
    self.record(Call::ExternalExec {
      client: client_script.to_string(),
      data_source: data_source_script.to_string(),
      content: content.to_string(),
    })
  }

  fn native_client_build(&self, _output: &Path, _workspace: &Path, _ejected_root: &Path) -> Result<(), ToolchainError> {
    self.record(Call::NativeClientBuild)
  }

  fn native_data_source_build(
    &self,
    _output: &Path,
    _config: &SiteConfig,
    _workspace: &Path,
  ) -> Result<(), ToolchainError> {
    self.record(Call::NativeDataSourceBuild)
  }

  fn bundle(&self, output: &Path) {
    let _ = self.record(Call::Bundle {
      output: output.to_path_buf(),
    });
  }

  fn theme_cleanup(&self, workspace: &Path) -> Result<(), ToolchainError> {
    self.record(Call::ThemeCleanup {
      workspace: workspace.to_path_buf(),
    })
  }

  fn scaffold_cleanup(&self, created: &[PathBuf], ejected_root: &Path) -> Result<(), ToolchainError> {
    self.record(Call::ScaffoldCleanup {
      created: created.to_vec(),
      ejected_root: ejected_root.to_path_buf(),
    })
  }
}
