//! Bundle declarations.

use std::path::Path;

use serde::Serialize;

use crate::consts::DEFAULT_EXTENSION;

/// A named bundle and its ordered dependency tokens, as declared in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleSpec {
  pub name: String,
  pub tokens: Vec<String>,
  extension: String,
}

impl BundleSpec {
  pub fn new<I, S>(name: impl Into<String>, tokens: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      name: name.into(),
      tokens: tokens.into_iter().map(Into::into).collect(),
      extension: DEFAULT_EXTENSION.to_string(),
    }
  }

  /// Extension appended to names that do not carry one.
  pub fn with_default_extension(mut self, extension: impl Into<String>) -> Self {
    self.extension = extension.into().trim_start_matches('.').to_string();
    self
  }

  /// Output file name: the bundle name, plus the default extension if it has none.
  pub fn file_name(&self) -> String {
    if Path::new(&self.name).extension().is_some() {
      self.name.clone()
    } else {
      format!("{}.{}", self.name, self.extension)
    }
  }
}
