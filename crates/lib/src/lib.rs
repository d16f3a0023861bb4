//! stylepack-lib: directive-driven style bundling
//!
//! This crate resolves declarative bundle definitions into concrete source files
//! and concatenates them into compiled bundles:
//! - `Directive`: one `require`, `require_directory` or `require_tree` dependency
//! - `AssetEnvironment`: search roots and requirable extensions
//! - `Resolver`: bundle → ordered, deduplicated `ResolvedManifest`
//! - `Emitter`: manifest → atomically published bundle file
//! - `compile`: every configured bundle, in parallel, with a compile record

pub mod bundle;
pub mod compile;
pub mod config;
pub mod consts;
pub mod directive;
pub mod emit;
pub mod env;
pub mod resolve;
pub mod util;

pub use bundle::BundleSpec;
pub use compile::{BundleOutcome, CompileError, CompileReport, compile, resolve_bundle};
pub use config::{Config, ConfigError};
pub use directive::{Directive, DirectiveKind};
pub use emit::{EmitOptions, Emitter};
pub use env::AssetEnvironment;
pub use resolve::{BundleError, ResolveError, ResolvedManifest, Resolver};
