//! folio-lib: build pipeline for folio sites
//!
//! A build turns a project directory, optionally layered over a theme, into a
//! deployable output tree:
//! - [`config`]: `folio.json` and command-line overrides
//! - [`pipeline`]: the ordered build stages and the panic guard around them
//! - [`toolchain`]: the capabilities the pipeline delegates to, and the
//!   filesystem-backed implementation used by the CLI
//! - [`cleanup`]: removal of the theme workspace or of newly ejected files

pub mod assets;
pub mod bundle;
pub mod cleanup;
pub mod config;
pub mod consts;
pub mod content;
pub mod context;
pub mod deps;
pub mod eject;
pub mod external;
pub mod native;
pub mod pipeline;
pub mod theme;
pub mod toolchain;
pub mod util;
pub mod workspace;
