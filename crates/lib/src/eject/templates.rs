//! Ejectable core files compiled into folio.

use super::{ScaffoldFile, ScaffoldKind};

pub const SCAFFOLD_FILES: &[ScaffoldFile] = &[
  ScaffoldFile {
    path: "main.js",
    contents: include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/ejectable/main.js")),
    kind: ScaffoldKind::Module,
  },
  ScaffoldFile {
    path: "router.js",
    contents: include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/ejectable/router.js")),
    kind: ScaffoldKind::Module,
  },
  ScaffoldFile {
    path: "shell.html",
    contents: include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/ejectable/shell.html")),
    kind: ScaffoldKind::Component,
  },
];
