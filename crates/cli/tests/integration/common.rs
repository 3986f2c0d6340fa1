//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated project directory.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Create a project with `folio.json` set to `config`.
  pub fn with_config(config: &str) -> Self {
    let env = Self::empty();
    env.write_file("folio.json", config);
    env
  }

  /// Create an empty project directory.
  pub fn empty() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Project root, canonicalized so it compares equal to paths the binary prints.
  pub fn root(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path()).unwrap_or_else(|_| self.temp.path().to_path_buf())
  }

  /// Write a file relative to the project root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn read_file(&self, relative_path: &str) -> String {
    std::fs::read_to_string(self.temp.path().join(relative_path))
      .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative_path, e))
  }

  pub fn exists(&self, relative_path: impl AsRef<Path>) -> bool {
    self.temp.path().join(relative_path).exists()
  }

  /// A `folio build` command running in the project root.
  ///
  /// `RUST_LOG` is cleared so log output only depends on the flags passed.
  pub fn build_cmd(&self) -> Command {
    self.build_cmd_in(".")
  }

  /// A `folio build` command running in `subdir` of the temp directory.
  pub fn build_cmd_in(&self, subdir: &str) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("folio");
    cmd.current_dir(self.temp.path().join(subdir));
    cmd.env_remove("RUST_LOG");
    cmd.arg("build");
    cmd
  }

  /// Seed a typical unthemed project.
  pub fn seed_site(&self) {
    self.write_file("content/index.json", r#"{ "title": "Home" }"#);
    self.write_file("content/pages/about.json", r#"{ "title": "About" }"#);
    self.write_file("layouts/page.html", "<main></main>");
    self.write_file("assets/site.css", "body {}");
  }
}
