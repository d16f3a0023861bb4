//! Enumerating the assets under a `require_directory` / `require_tree` root.
//!
//! Both walks order siblings byte-wise by file name. A tree walk is pre-order
//! depth-first with files and directories interleaved by that order, so
//! `root/sub/y.css` is visited before `root/x.css`.
//!
//! Symlinked directories are not descended into, so a walk never leaves the
//! directory it was started in. Excluded paths are pruned with everything below
//! them.

use std::path::{Path, PathBuf};

use tracing::trace;
use walkdir::WalkDir;

use super::types::ResolveError;
use crate::env::SearchContext;
use crate::util::fs::{list_entries, stat};

/// What a walk contributes to a manifest.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Walk {
  /// Requirable files, in visit order.
  pub assets: Vec<PathBuf>,
  /// Visited directories, the root first.
  pub directories: Vec<PathBuf>,
}

/// The requirable files directly inside `root`. Nested directories are skipped.
pub fn list_directory(root: &Path, ctx: &SearchContext<'_>) -> Result<Walk, ResolveError> {
  let names = list_entries(root).map_err(|source| ResolveError::Io {
    path: root.to_path_buf(),
    source,
  })?;

  let mut walk = Walk {
    assets: Vec::new(),
    directories: vec![root.to_path_buf()],
  };

  for name in names {
    let path = root.join(name);
    if path == ctx.origin() {
      trace!(path = %path.display(), "skipping declaring file");
      continue;
    }
    if ctx.env().is_excluded(&path) {
      trace!(path = %path.display(), "skipping excluded path");
      continue;
    }
    if stat(&path).is_some_and(|s| s.is_dir) {
      continue;
    }
    if ctx.env().is_requirable(&path) {
      walk.assets.push(path);
    }
  }

  Ok(walk)
}

/// Every requirable file below `root`, depth-first, recording each directory visited.
pub fn walk_recursive(root: &Path, ctx: &SearchContext<'_>) -> Result<Walk, ResolveError> {
  let mut walk = Walk {
    assets: Vec::new(),
    directories: vec![root.to_path_buf()],
  };

  let walker = WalkDir::new(root)
    .min_depth(1)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|e| !ctx.env().is_excluded(e.path()));

  for entry in walker {
    let entry = entry.map_err(|e| ResolveError::Io {
      path: e.path().unwrap_or(root).to_path_buf(),
      source: e.into(),
    })?;
    let path = entry.path();

    if path == ctx.origin() {
      trace!(path = %path.display(), "skipping declaring file");
      continue;
    }

    if entry.file_type().is_dir() {
      walk.directories.push(path.to_path_buf());
    } else if entry.path_is_symlink() && stat(path).is_some_and(|s| s.is_dir) {
      trace!(path = %path.display(), "not following directory symlink");
    } else if ctx.env().is_requirable(path) {
      walk.assets.push(path.to_path_buf());
    }
  }

  Ok(walk)
}
