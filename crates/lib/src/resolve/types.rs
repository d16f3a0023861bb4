//! Types produced and raised by bundle resolution.

use std::collections::{BTreeSet, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::directive::DirectiveKind;

/// The resolved, deduplicated, ordered sources of one bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedManifest {
  /// Bundle identifier.
  pub bundle: String,
  /// Absolute source files in load order. No path appears twice.
  pub files: Vec<PathBuf>,
  /// Directories whose changes invalidate the bundle. Never bundled themselves.
  pub dependencies: BTreeSet<PathBuf>,
  #[serde(skip)]
  seen: HashSet<PathBuf>,
}

impl ResolvedManifest {
  pub fn new(bundle: impl Into<String>) -> Self {
    Self {
      bundle: bundle.into(),
      files: Vec::new(),
      dependencies: BTreeSet::new(),
      seen: HashSet::new(),
    }
  }

  /// Append `path` unless it is already present. Returns whether it was added.
  pub fn push_file(&mut self, path: PathBuf) -> bool {
    if self.seen.contains(&path) {
      return false;
    }
    self.seen.insert(path.clone());
    self.files.push(path);
    true
  }

  /// Record a directory the bundle's freshness depends on.
  pub fn depend_on(&mut self, dir: PathBuf) {
    self.dependencies.insert(dir);
  }

  pub fn contains(&self, path: &Path) -> bool {
    self.seen.contains(path)
  }

  pub fn is_empty(&self) -> bool {
    self.files.is_empty()
  }
}

/// Why a single directive could not be resolved.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// Malformed token, non-relative directory/tree argument, or a root that
  /// escapes the environment.
  #[error("invalid directive: {reason}")]
  InvalidDirective { reason: String },

  /// A `require` target matched no file in any search root.
  #[error("could not find '{path}' (required from {})", .origin.display())]
  NotFound { path: String, origin: PathBuf },

  /// A directory/tree root is missing or not a directory.
  #[error("{kind} argument must be a directory: {}", .path.display())]
  NotADirectory { kind: DirectiveKind, path: PathBuf },

  /// A directory could not be read while walking it.
  #[error("failed to read {}: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// A resolution failure with enough context to report it precisely.
#[derive(Debug, Error)]
#[error("bundle '{bundle}': directive '{token}' (declared in {}): {source}", .origin.display())]
pub struct BundleError {
  pub bundle: String,
  pub token: String,
  pub origin: PathBuf,
  #[source]
  pub source: ResolveError,
}
