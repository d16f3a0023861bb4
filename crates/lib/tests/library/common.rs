//! Shared helpers for library integration tests.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary site with a `theme/` directory holding the given files.
pub struct Site {
  pub _temp: TempDir,
  pub base: PathBuf,
}

impl Site {
  pub fn new(files: &[(&str, &str)]) -> Self {
    let temp = TempDir::new().unwrap();
    let base = dunce::canonicalize(temp.path()).unwrap();
    std::fs::create_dir_all(base.join("theme")).unwrap();
    let site = Self { _temp: temp, base };
    for (path, content) in files {
      site.write(&format!("theme/{path}"), content);
    }
    site
  }

  pub fn write(&self, relative: &str, content: &str) {
    let path = self.base.join(relative);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
  }

  pub fn theme(&self) -> PathBuf {
    self.base.join("theme")
  }

  pub fn read(&self, relative: &str) -> String {
    std::fs::read_to_string(self.base.join(relative)).unwrap()
  }
}

/// Paths relative to `root`, `/`-separated.
pub fn names(root: &Path, paths: &[PathBuf]) -> Vec<String> {
  paths
    .iter()
    .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
    .collect()
}

pub fn block_on<F: std::future::Future>(f: F) -> F::Output {
  tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .unwrap()
    .block_on(f)
}
