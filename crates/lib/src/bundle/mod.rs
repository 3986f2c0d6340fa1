//! ES-module post-processing of the build output.
//!
//! Browsers cannot resolve bare import specifiers (`import x from "pkg"`).
//! After the build, every `.js` file under `<output>/spa/` has its bare
//! specifiers rewritten to `/spa/web_modules/<pkg>.js`, and the package's
//! entry file is copied there from the first `node_modules/` that has it.
//! Copied modules are processed the same way, so their own imports resolve
//! too. The generated content index is data, not code, and is never touched.
//!
//! Bundling never fails the build: problems are logged and listed in the
//! returned [`BundleReport`].

use std::collections::{BTreeSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::consts::{CONTENT_MODULE, EJECTED_DIR, NODE_MODULES_DIR, PACKAGE_JSON, SPA_DIR, WEB_MODULES_DIR};

/// Specifiers in `import`/`export ... from` statements that start a line,
/// bare `import "x"` statements, and dynamic `import("x")` calls.
static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(concat!(
    r#"(?m)(?P<prefix>^[ \t]*(?:import|export)\b[^;"']*?\bfrom\s*|^[ \t]*import\s*|\bimport\s*\(\s*)"#,
    r#"(?P<quote>["'])(?P<spec>[^"'./][^"']*)["']"#
  ))
  .expect("import pattern is valid")
});

/// What a [`Bundler::bundle`] pass did.
#[derive(Debug, Default, Serialize)]
pub struct BundleReport {
  pub files_rewritten: usize,
  pub modules_copied: Vec<String>,
  /// Specifiers no search root could provide.
  pub unresolved: Vec<String>,
}

/// Rewrites bare imports and copies the modules they name.
#[derive(Debug, Clone)]
pub struct Bundler {
  /// Directories whose `node_modules/` are searched, in order.
  search_roots: Vec<PathBuf>,
}

impl Bundler {
  pub fn new(search_roots: Vec<PathBuf>) -> Self {
    Self { search_roots }
  }

  pub fn bundle(&self, output: &Path) -> BundleReport {
    let spa = output.join(SPA_DIR);
    let web_modules = spa.join(WEB_MODULES_DIR);
    let content_module = spa.join(EJECTED_DIR).join(CONTENT_MODULE);
    let mut report = BundleReport::default();

    let mut queue: VecDeque<PathBuf> = WalkDir::new(&spa)
      .sort_by_file_name()
      .into_iter()
      .filter_map(|e| e.ok())
      .filter(|e| e.file_type().is_file() && e.path().extension().is_some_and(|ext| ext == "js"))
      .filter(|e| e.path() != content_module)
      .map(|e| e.into_path())
      .collect();
    let mut seen: BTreeSet<String> = BTreeSet::new();

    while let Some(file) = queue.pop_front() {
      let source = match fs::read_to_string(&file) {
        Ok(s) => s,
        Err(e) => {
          warn!(path = %file.display(), error = %e, "failed to read module, skipping");
          continue;
        }
      };

      let mut specs = Vec::new();
      let rewritten = IMPORT_RE.replace_all(&source, |caps: &Captures| {
        let spec = &caps["spec"];
        if spec.contains("://") {
          return caps[0].to_string();
        }
        specs.push(spec.to_string());
        format!(
          "{}{q}/{}/{}/{}.js{q}",
          &caps["prefix"],
          SPA_DIR,
          WEB_MODULES_DIR,
          spec.trim_end_matches(".js"),
          q = &caps["quote"]
        )
      });

      if specs.is_empty() {
        continue;
      }
      if let Err(e) = fs::write(&file, rewritten.as_bytes()) {
        warn!(path = %file.display(), error = %e, "failed to rewrite imports");
        continue;
      }
      report.files_rewritten += 1;

      for spec in specs {
        if !seen.insert(spec.clone()) {
          continue;
        }
        match self.copy_module(&spec, &web_modules) {
          Some(copied) => {
            debug!(module = %spec, "copied web module");
            report.modules_copied.push(spec);
            queue.push_back(copied);
          }
          None => {
            warn!(module = %spec, "module not found in node_modules, import left unresolved");
            report.unresolved.push(spec);
          }
        }
      }
    }

    info!(
      files = report.files_rewritten,
      modules = report.modules_copied.len(),
      "bundled web modules"
    );
    report
  }

  /// Copy the entry file for `spec` to `<web_modules>/<spec>.js`.
  fn copy_module(&self, spec: &str, web_modules: &Path) -> Option<PathBuf> {
    let entry = self
      .search_roots
      .iter()
      .find_map(|root| resolve_entry(&root.join(NODE_MODULES_DIR), spec))?;

    let target = web_modules.join(format!("{}.js", spec.trim_end_matches(".js")));
    if let Some(parent) = target.parent() {
      if let Err(e) = fs::create_dir_all(parent) {
        warn!(path = %parent.display(), error = %e, "failed to create web_modules directory");
        return None;
      }
    }
    match fs::copy(&entry, &target) {
      Ok(_) => Some(target),
      Err(e) => {
        warn!(from = %entry.display(), error = %e, "failed to copy web module");
        None
      }
    }
  }
}

/// Locate the file a bare specifier refers to inside `node_modules`.
///
/// A package directory resolves through its `package.json` (`module`, then
/// `main`), falling back to `index.js`; a subpath resolves to the file itself.
fn resolve_entry(node_modules: &Path, spec: &str) -> Option<PathBuf> {
  let base = node_modules.join(spec);

  if base.is_dir() {
    let manifest = fs::read_to_string(base.join(PACKAGE_JSON))
      .ok()
      .and_then(|raw| serde_json::from_str::<serde_json::Value>(&raw).ok());
    let declared = manifest.as_ref().and_then(|m| {
      ["module", "main"]
        .iter()
        .find_map(|key| m.get(*key).and_then(|v| v.as_str()))
        .map(|entry| base.join(entry))
    });
    return declared
      .filter(|p| p.is_file())
      .or_else(|| Some(base.join("index.js")).filter(|p| p.is_file()));
  }

  if base.is_file() {
    return Some(base);
  }
  let with_ext = node_modules.join(format!("{}.js", spec));
  with_ext.is_file().then_some(with_ext)
}
