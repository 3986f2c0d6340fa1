//! Names and fixed layout of a folio project.

/// Persisted project configuration, relative to the project root.
pub const CONFIG_FILENAME: &str = "folio.json";

/// Build output directory used when neither the config nor `--dir` names one.
pub const DEFAULT_BUILD_DIR: &str = "public";

/// Directory holding installed themes, relative to a project or theme root.
pub const THEMES_DIR: &str = "themes";

/// Temporary workspace a theme is staged into, relative to the project root.
pub const TEMP_BUILD_DIR: &str = ".folio-build";

/// Where ejectable core files are materialized inside the active workspace.
pub const EJECTED_DIR: &str = "ejected";

pub const ASSETS_DIR: &str = "assets";
pub const CONTENT_DIR: &str = "content";
pub const LAYOUTS_DIR: &str = "layouts";
pub const NODE_MODULES_DIR: &str = "node_modules";
pub const PACKAGE_JSON: &str = "package.json";

/// Generated content index module, written beside the ejected client files.
pub const CONTENT_MODULE: &str = "content.js";

/// Client application root inside the build output.
pub const SPA_DIR: &str = "spa";

/// Bundled third-party modules, relative to [`SPA_DIR`].
pub const WEB_MODULES_DIR: &str = "web_modules";

/// Paths never merged from the project over a theme workspace.
pub const MERGE_IGNORED: &[&str] = &[THEMES_DIR, TEMP_BUILD_DIR, NODE_MODULES_DIR, ".git"];
