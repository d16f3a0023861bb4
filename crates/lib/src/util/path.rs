//! Lexical path helpers.

use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` components without touching the filesystem.
///
/// `..` at the root is dropped, so the result of normalizing an absolute path
/// is always absolute.
pub fn normalize(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();
  for component in path.components() {
    match component {
      Component::ParentDir => {
        normalized.pop();
      }
      Component::CurDir => {}
      _ => normalized.push(component),
    }
  }
  normalized
}

/// True if `path` matches `^\.($|\.?/)`: `.`, `./…` or `../…`.
///
/// Only these forms are resolved against the declaring file's directory.
pub fn is_relative(path: &str) -> bool {
  match path.strip_prefix('.') {
    Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with("./"),
    None => false,
  }
}
