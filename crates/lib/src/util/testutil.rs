//! Test utilities for stylepack-lib.
//!
//! Helpers for laying out asset trees inside a temporary directory.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Write `files` (relative path, content) under `root`, creating directories.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
  for (relative, content) in files {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }
}

/// A temporary theme directory, canonicalized so paths compare equal to resolved ones.
pub fn theme_dir(files: &[(&str, &str)]) -> (TempDir, PathBuf) {
  let temp = TempDir::new().unwrap();
  let root = dunce::canonicalize(temp.path()).unwrap();
  write_tree(&root, files);
  (temp, root)
}

/// File names of resolved paths, relative to `root`, with `/` separators.
pub fn relative_names(root: &Path, paths: &[PathBuf]) -> Vec<String> {
  paths
    .iter()
    .map(|p| {
      p.strip_prefix(root)
        .unwrap_or(p)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
    })
    .collect()
}
