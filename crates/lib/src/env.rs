//! The asset environment a bundle is resolved in.
//!
//! An [`AssetEnvironment`] is built once from configuration and handed to the
//! resolver. It owns the environment root (where bundle declaring files live),
//! the ordered search roots for bare `require` paths, and the set of extensions
//! that make a file requirable. Excluded paths (compiled output living under the
//! root) are never listed by directory or tree walks.

use std::path::{Path, PathBuf};

use crate::consts::DEFAULT_EXTENSION;
use crate::util::fs::stat;
use crate::util::path::normalize;

#[derive(Debug, Clone)]
pub struct AssetEnvironment {
  root: PathBuf,
  search_paths: Vec<PathBuf>,
  extensions: Vec<String>,
  excluded: Vec<PathBuf>,
}

impl AssetEnvironment {
  /// Create an environment rooted at `root`.
  ///
  /// The root is registered as the first search path and only `.css` files are
  /// requirable until [`with_extensions`](Self::with_extensions) says otherwise.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    let root = absolute(root.into());
    Self {
      search_paths: vec![root.clone()],
      root,
      extensions: vec![DEFAULT_EXTENSION.to_string()],
      excluded: Vec::new(),
    }
  }

  /// Register an additional search root. Roots are searched in registration order.
  pub fn append_path(mut self, path: impl Into<PathBuf>) -> Self {
    let path = absolute(path.into());
    if !self.search_paths.contains(&path) {
      self.search_paths.push(path);
    }
    self
  }

  /// Replace the set of requirable extensions (given without the leading dot).
  pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.extensions = extensions
      .into_iter()
      .map(|e| e.into().trim_start_matches('.').to_string())
      .collect();
    self
  }

  /// Hide a file, or a directory and everything below it, from walks.
  pub fn exclude(mut self, path: impl Into<PathBuf>) -> Self {
    let path = absolute(path.into());
    if !self.excluded.contains(&path) {
      self.excluded.push(path);
    }
    self
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn search_paths(&self) -> &[PathBuf] {
    &self.search_paths
  }

  pub fn extensions(&self) -> &[String] {
    &self.extensions
  }

  /// Whether `path` may be bundled: an existing regular file with a requirable extension.
  pub fn is_requirable(&self, path: &Path) -> bool {
    let has_extension = path
      .extension()
      .and_then(|e| e.to_str())
      .map(|ext| self.extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
      .unwrap_or(false);

    has_extension && stat(path).is_some_and(|s| s.is_file)
  }

  pub fn is_excluded(&self, path: &Path) -> bool {
    self.excluded.iter().any(|excluded| path.starts_with(excluded))
  }

  /// Whether `path` lies at or below the environment root.
  pub fn contains(&self, path: &Path) -> bool {
    path.starts_with(&self.root)
  }

  /// The search context for a file declared at `origin`.
  pub fn context(&self, origin: impl Into<PathBuf>) -> SearchContext<'_> {
    SearchContext {
      origin: absolute(origin.into()),
      env: self,
    }
  }
}

/// Where a directive was declared, plus the environment it resolves against.
#[derive(Debug, Clone)]
pub struct SearchContext<'a> {
  origin: PathBuf,
  env: &'a AssetEnvironment,
}

impl<'a> SearchContext<'a> {
  /// The declaring file.
  pub fn origin(&self) -> &Path {
    &self.origin
  }

  /// Directory relative paths are resolved against.
  pub fn origin_dir(&self) -> &Path {
    self.origin.parent().unwrap_or(&self.origin)
  }

  /// Extension of the declaring file, tried for extension-less `require` paths.
  pub fn default_extension(&self) -> Option<&str> {
    self.origin.extension().and_then(|e| e.to_str())
  }

  pub fn env(&self) -> &'a AssetEnvironment {
    self.env
  }
}

fn absolute(path: PathBuf) -> PathBuf {
  let path = std::path::absolute(&path).unwrap_or(path);
  normalize(&path)
}
