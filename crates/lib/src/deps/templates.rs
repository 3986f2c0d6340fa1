//! Embedded baseline runtime dependencies.

/// Default `package.json` for a workspace that has none.
pub const PACKAGE_JSON_TEMPLATE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/defaults/package.json"));

/// Files seeded into `node_modules/`, as (path relative to `node_modules/`, contents).
pub const NODE_MODULES: &[(&str, &str)] = &[
  (
    "folio-router/package.json",
    include_str!(concat!(
      env!("CARGO_MANIFEST_DIR"),
      "/defaults/node_modules/folio-router/package.json"
    )),
  ),
  (
    "folio-router/index.js",
    include_str!(concat!(
      env!("CARGO_MANIFEST_DIR"),
      "/defaults/node_modules/folio-router/index.js"
    )),
  ),
];
