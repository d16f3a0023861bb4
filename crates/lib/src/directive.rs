//! Dependency directive parsing.
//!
//! A bundle declares its dependencies as an ordered list of raw tokens. Each token
//! is turned into a typed [`Directive`] by looking at its suffix:
//!
//! - `path/**/*` requires every asset below `path`, recursively
//! - `path/*` requires the assets directly inside `path`
//! - anything else requires a single file
//!
//! Suffix stripping happens before any other interpretation of the token, so
//! `./vendor/**/*` becomes `RequireTree("./vendor")` and never a plain require.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::consts::{DIRECTORY_SUFFIX, TREE_SUFFIX};

/// The kind of a directive, without its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveKind {
  Require,
  RequireDirectory,
  RequireTree,
}

impl DirectiveKind {
  /// Name of the directive as written in directive-style manifests.
  pub fn as_str(self) -> &'static str {
    match self {
      DirectiveKind::Require => "require",
      DirectiveKind::RequireDirectory => "require_directory",
      DirectiveKind::RequireTree => "require_tree",
    }
  }
}

impl fmt::Display for DirectiveKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One dependency relationship of a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Directive {
  /// A single file, relative (`./x.css`) or searched in the environment roots.
  Require(String),
  /// Every requirable file directly inside a directory.
  RequireDirectory(String),
  /// Every requirable file below a directory, depth-first.
  RequireTree(String),
}

impl Directive {
  pub fn kind(&self) -> DirectiveKind {
    match self {
      Directive::Require(_) => DirectiveKind::Require,
      Directive::RequireDirectory(_) => DirectiveKind::RequireDirectory,
      Directive::RequireTree(_) => DirectiveKind::RequireTree,
    }
  }

  /// The path argument with any directive suffix removed.
  pub fn path(&self) -> &str {
    match self {
      Directive::Require(path) | Directive::RequireDirectory(path) | Directive::RequireTree(path) => path,
    }
  }
}

impl fmt::Display for Directive {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} \"{}\"", self.kind(), self.path())
  }
}

/// Errors produced while turning raw tokens into directives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
  #[error("invalid directive '{token}': {reason}")]
  InvalidDirective { token: String, reason: String },
}

/// Parse a single raw dependency token.
pub fn parse(token: &str) -> Result<Directive, DirectiveError> {
  let (ctor, path): (fn(String) -> Directive, &str) = if let Some(prefix) = token.strip_suffix(TREE_SUFFIX) {
    (Directive::RequireTree, prefix)
  } else if let Some(prefix) = token.strip_suffix(DIRECTORY_SUFFIX) {
    (Directive::RequireDirectory, prefix)
  } else {
    (Directive::Require, token)
  };

  if path.trim().is_empty() {
    return Err(DirectiveError::InvalidDirective {
      token: token.to_string(),
      reason: "path is empty".to_string(),
    });
  }

  Ok(ctor(path.to_string()))
}

/// Parse an ordered token list, preserving order.
///
/// Returns each directive paired with the token it came from so that later
/// failures can point back at the offending token.
pub fn parse_all<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<(String, Directive)>, DirectiveError> {
  tokens
    .iter()
    .map(|token| {
      let token = token.as_ref();
      parse(token).map(|directive| (token.to_string(), directive))
    })
    .collect()
}
