//! External-runtime build strategy.
//!
//! Instead of building in-process, folio generates two JavaScript programs
//! (client build and data-source build) plus the content index, and hands
//! them to a script runtime such as `node`. The runtime receives a small
//! embedded driver via `-e`; the scripts and index arrive as one JSON
//! document on stdin.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use serde::Serialize;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::SiteConfig;
use crate::content::{self, ContentError};

const DRIVER_JS: &str = include_str!("driver.js");
const CLIENT_JS: &str = include_str!("client.js");
const DATA_SOURCE_JS: &str = include_str!("data_source.js");

#[derive(Debug, Error)]
pub enum ExternalError {
  #[error("script runtime '{runtime}' not found: {source}")]
  RuntimeNotFound { runtime: String, source: which::Error },

  #[error("failed to start {}: {source}", runtime.display())]
  Spawn { runtime: PathBuf, source: std::io::Error },

  #[error("external build failed with exit code {code:?}: {stderr}")]
  Failed { code: Option<i32>, stderr: String },

  #[error("failed to create async runtime: {0}")]
  AsyncRuntime(#[source] std::io::Error),

  #[error("failed to encode runtime input: {0}")]
  Encode(#[from] serde_json::Error),

  #[error(transparent)]
  Content(#[from] ContentError),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DriverInput<'a> {
  client: &'a str,
  data_source: &'a str,
  content: &'a str,
}

fn js_string(path: &Path) -> String {
  // serde_json string escaping is valid JavaScript string syntax.
  serde_json::Value::String(path.to_string_lossy().into_owned()).to_string()
}

/// Script that builds the client app into `output`.
pub fn client_script(output: &Path, workspace: &Path) -> String {
  CLIENT_JS
    .replace("__OUTPUT__", &js_string(output))
    .replace("__WORKSPACE__", &js_string(workspace))
}

/// Script that writes the content index into `output`, plus the index itself.
///
/// The index is collected in-process, so a malformed content file fails here
/// before any runtime is started.
pub fn data_source_script(
  output: &Path,
  config: &SiteConfig,
  workspace: &Path,
) -> Result<(String, String), ExternalError> {
  let nodes = content::collect(workspace, &config.routes)?;
  let index = content::to_json(&nodes)?;
  let script = DATA_SOURCE_JS.replace("__OUTPUT__", &js_string(output));
  Ok((script, index))
}

/// Run both scripts with `runtime`, waiting for it to finish.
pub async fn exec(runtime: &str, client: &str, data_source: &str, content: &str) -> Result<(), ExternalError> {
  let program = which::which(runtime).map_err(|e| ExternalError::RuntimeNotFound {
    runtime: runtime.to_string(),
    source: e,
  })?;

  let input = serde_json::to_vec(&DriverInput {
    client,
    data_source,
    content,
  })?;

  info!(runtime = %program.display(), "running external build");

  let mut child = Command::new(&program)
    .arg("-e")
    .arg(DRIVER_JS)
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .kill_on_drop(true)
    .spawn()
    .map_err(|e| ExternalError::Spawn {
      runtime: program.clone(),
      source: e,
    })?;

  if let Some(mut stdin) = child.stdin.take() {
    // A runtime that exits early closes the pipe; its exit status says why.
    if let Err(e) = stdin.write_all(&input).await {
      debug!(error = %e, "runtime closed stdin early");
    }
  }

  let output = child.wait_with_output().await.map_err(|e| ExternalError::Spawn {
    runtime: program.clone(),
    source: e,
  })?;

  let stdout = String::from_utf8_lossy(&output.stdout);
  if !stdout.trim().is_empty() {
    debug!(stdout = %stdout.trim(), "runtime output");
  }

  if !output.status.success() {
    return Err(ExternalError::Failed {
      code: output.status.code(),
      stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    });
  }

  Ok(())
}

/// [`exec`] on a single-threaded runtime, for the synchronous pipeline.
pub fn exec_blocking(runtime: &str, client: &str, data_source: &str, content: &str) -> Result<(), ExternalError> {
  let rt = tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .map_err(ExternalError::AsyncRuntime)?;
  rt.block_on(exec(runtime, client, data_source, content))
}
