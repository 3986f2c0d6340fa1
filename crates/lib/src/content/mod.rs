//! Content index.
//!
//! Every `content/**/*.json` file in the active workspace becomes one
//! [`ContentNode`]. The first directory under `content/` is the node's type;
//! its URL comes from the type's route in `folio.json` when one is set.
//!
//! ```text
//! content/index.json           → type "index", path "/"
//! content/pages/about.json     → type "pages", path "/pages/about"
//! content/blog/hello.json      → type "blog",  path "/posts/hello"   (routes: { "blog": "/posts/:filename" })
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use crate::consts::{CONTENT_DIR, CONTENT_MODULE, EJECTED_DIR, SPA_DIR};

#[derive(Debug, Error)]
pub enum ContentError {
  #[error("failed to walk content directory {}: {source}", path.display())]
  Walk { path: PathBuf, source: walkdir::Error },

  #[error("failed to read content file {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("invalid JSON in content file {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_json::Error },

  #[error("failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },

  #[error("failed to serialize content index: {0}")]
  Serialize(#[from] serde_json::Error),
}

/// A single piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentNode {
  /// URL path the node is served at.
  pub path: String,
  #[serde(rename = "type")]
  pub kind: String,
  /// File stem of the source file.
  pub filename: String,
  pub fields: serde_json::Value,
}

/// Read every content file under `<workspace>/content`, sorted by source path.
pub fn collect(workspace: &Path, routes: &BTreeMap<String, String>) -> Result<Vec<ContentNode>, ContentError> {
  let root = workspace.join(CONTENT_DIR);
  if !root.is_dir() {
    debug!(path = %root.display(), "no content directory");
    return Ok(Vec::new());
  }

  let mut nodes = Vec::new();
  for entry in WalkDir::new(&root).sort_by_file_name() {
    let entry = entry.map_err(|e| ContentError::Walk {
      path: root.clone(),
      source: e,
    })?;
    let path = entry.path();
    if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "json") {
      continue;
    }

    let raw = fs::read_to_string(path).map_err(|e| ContentError::Read {
      path: path.to_path_buf(),
      source: e,
    })?;
    let fields = serde_json::from_str(&raw).map_err(|e| ContentError::Parse {
      path: path.to_path_buf(),
      source: e,
    })?;

    let rel = path.strip_prefix(&root).unwrap_or(path).with_extension("");
    let segments: Vec<String> = rel
      .components()
      .filter_map(|c| match c {
        Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
        _ => None,
      })
      .collect();
    let Some(filename) = segments.last().cloned() else {
      continue;
    };
    let kind = segments[0].clone();

    nodes.push(ContentNode {
      path: node_path(&segments, &kind, &filename, routes),
      kind,
      filename,
      fields,
    });
  }

  debug!(nodes = nodes.len(), "collected content");
  Ok(nodes)
}

fn node_path(segments: &[String], kind: &str, filename: &str, routes: &BTreeMap<String, String>) -> String {
  if let Some(pattern) = routes.get(kind) {
    let path = pattern.replace(":filename", filename);
    return if path.starts_with('/') { path } else { format!("/{}", path) };
  }

  let mut segments = segments.to_vec();
  if segments.last().is_some_and(|s| s == "index") {
    segments.pop();
  }
  format!("/{}", segments.join("/"))
}

/// Serialize the content index as passed to the client and the external runtime.
pub fn to_json(nodes: &[ContentNode]) -> Result<String, ContentError> {
  Ok(serde_json::to_string(nodes)?)
}

/// Write the content index and one `index.json` per node into `output`.
///
/// The index lands in `<output>/spa/ejected/content.js` as an ES module so
/// the ejected client can import it.
pub fn write_outputs(output: &Path, nodes: &[ContentNode]) -> Result<(), ContentError> {
  let module = output.join(SPA_DIR).join(EJECTED_DIR).join(CONTENT_MODULE);
  write(&module, &format!("export default {};\n", to_json(nodes)?))?;

  for node in nodes {
    let dir = output.join(node.path.trim_start_matches('/'));
    write(&dir.join("index.json"), &serde_json::to_string_pretty(&node.fields)?)?;
  }

  Ok(())
}

fn write(path: &Path, contents: &str) -> Result<(), ContentError> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).map_err(|e| ContentError::Write {
      path: parent.to_path_buf(),
      source: e,
    })?;
  }
  fs::write(path, contents).map_err(|e| ContentError::Write {
    path: path.to_path_buf(),
    source: e,
  })
}
