//! Bundle resolution.
//!
//! The [`Resolver`] turns a [`BundleSpec`] into a [`ResolvedManifest`]:
//! - parse each token into a directive, in declared order
//! - resolve `require` paths against the declaring file or the search roots
//! - walk `require_directory` / `require_tree` roots
//! - append newly discovered files, skipping any already present
//!
//! Each bundle is declared by a virtual file at `<environment root>/<bundle file
//! name>`. It anchors relative paths and is never itself bundled. Resolved files
//! are not scanned for further directives: only one level of dependencies exists.

pub mod path;
pub mod types;
pub mod walk;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::bundle::BundleSpec;
use crate::directive::{Directive, DirectiveError, parse_all};
use crate::env::{AssetEnvironment, SearchContext};

pub use path::{resolve_directory_root, resolve_require};
pub use types::{BundleError, ResolveError, ResolvedManifest};
pub use walk::{Walk, list_directory, walk_recursive};

/// Resolves bundles against one asset environment.
///
/// Cheap to clone; clones share the environment.
#[derive(Debug, Clone)]
pub struct Resolver {
  env: Arc<AssetEnvironment>,
}

impl Resolver {
  pub fn new(env: AssetEnvironment) -> Self {
    Self { env: Arc::new(env) }
  }

  pub fn env(&self) -> &AssetEnvironment {
    &self.env
  }

  /// The virtual file that declares `bundle`.
  pub fn origin(&self, bundle: &BundleSpec) -> PathBuf {
    self.env.root().join(bundle.file_name())
  }

  /// Resolve a bundle into its ordered, deduplicated source files.
  ///
  /// Fails fast: the first directive that cannot be resolved aborts the bundle.
  pub fn resolve(&self, bundle: &BundleSpec) -> Result<ResolvedManifest, BundleError> {
    let origin = self.origin(bundle);
    let ctx = self.env.context(origin.clone());

    let directives = parse_all(&bundle.tokens).map_err(|e| match e {
      DirectiveError::InvalidDirective { token, reason } => BundleError {
        bundle: bundle.name.clone(),
        token,
        origin: origin.clone(),
        source: ResolveError::InvalidDirective { reason },
      },
    })?;

    let mut manifest = ResolvedManifest::new(&bundle.name);

    for (token, directive) in directives {
      debug!(bundle = %bundle.name, %directive, "processing directive");
      self
        .apply(&directive, &ctx, &mut manifest)
        .map_err(|source| BundleError {
          bundle: bundle.name.clone(),
          token,
          origin: origin.clone(),
          source,
        })?;
    }

    info!(
      bundle = %bundle.name,
      files = manifest.files.len(),
      dependencies = manifest.dependencies.len(),
      "resolved bundle"
    );

    Ok(manifest)
  }

  fn apply(
    &self,
    directive: &Directive,
    ctx: &SearchContext<'_>,
    manifest: &mut ResolvedManifest,
  ) -> Result<(), ResolveError> {
    let walk = match directive {
      Directive::Require(path) => {
        let file = resolve_require(path, ctx)?;
        add_file(manifest, file);
        return Ok(());
      }
      Directive::RequireDirectory(path) => {
        let root = resolve_directory_root(directive.kind(), path, ctx)?;
        list_directory(&root, ctx)?
      }
      Directive::RequireTree(path) => {
        let root = resolve_directory_root(directive.kind(), path, ctx)?;
        walk_recursive(&root, ctx)?
      }
    };

    for dir in walk.directories {
      manifest.depend_on(dir);
    }
    for file in walk.assets {
      add_file(manifest, file);
    }
    Ok(())
  }
}

fn add_file(manifest: &mut ResolvedManifest, file: PathBuf) {
  let shown = file.display().to_string();
  if manifest.push_file(file) {
    debug!(bundle = %manifest.bundle, file = %shown, "added source");
  } else {
    debug!(bundle = %manifest.bundle, file = %shown, "already required, skipping");
  }
}
