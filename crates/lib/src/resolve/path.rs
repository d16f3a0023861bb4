//! Turning directive path tokens into absolute filesystem locations.

use std::path::{Path, PathBuf};

use tracing::trace;

use super::types::ResolveError;
use crate::directive::DirectiveKind;
use crate::env::SearchContext;
use crate::util::fs::stat;
use crate::util::path::{is_relative, normalize};

/// Resolve the argument of a `require` directive to an existing file.
///
/// Relative paths (`./x`, `../x`) are joined to the declaring file's directory.
/// Bare paths are looked up in each search root, in registration order. At each
/// location the path is tried as written, then, if it has no extension, with the
/// declaring file's extension appended.
pub fn resolve_require(path: &str, ctx: &SearchContext<'_>) -> Result<PathBuf, ResolveError> {
  let bases: Vec<PathBuf> = if is_relative(path) {
    vec![ctx.origin_dir().join(path)]
  } else {
    ctx.env().search_paths().iter().map(|root| root.join(path)).collect()
  };

  for base in bases {
    for candidate in candidates(&base, ctx.default_extension()) {
      let candidate = normalize(&candidate);
      trace!(candidate = %candidate.display(), "trying require candidate");
      if stat(&candidate).is_some_and(|s| s.is_file) {
        return Ok(candidate);
      }
    }
  }

  Err(ResolveError::NotFound {
    path: path.to_string(),
    origin: ctx.origin().to_path_buf(),
  })
}

/// Resolve the argument of a `require_directory` / `require_tree` directive.
///
/// The argument must be relative to the declaring file, must stay inside the
/// environment root once normalized, and must name an existing directory.
pub fn resolve_directory_root(
  kind: DirectiveKind,
  path: &str,
  ctx: &SearchContext<'_>,
) -> Result<PathBuf, ResolveError> {
  if !is_relative(path) {
    return Err(ResolveError::InvalidDirective {
      reason: format!("{kind} argument must be a relative path starting with './', got '{path}'"),
    });
  }

  let root = normalize(&ctx.origin_dir().join(path));
  if !ctx.env().contains(&root) {
    return Err(ResolveError::InvalidDirective {
      reason: format!(
        "{kind} argument '{path}' escapes the environment root {}",
        ctx.env().root().display()
      ),
    });
  }

  match stat(&root) {
    Some(s) if s.is_dir => Ok(root),
    _ => Err(ResolveError::NotADirectory { kind, path: root }),
  }
}

/// The exact path, then the default-extension variant for extension-less paths.
fn candidates(base: &Path, extension: Option<&str>) -> Vec<PathBuf> {
  let mut out = vec![base.to_path_buf()];
  if let Some(ext) = extension
    && base.extension().is_none()
  {
    let mut with_ext = base.as_os_str().to_owned();
    with_ext.push(".");
    with_ext.push(ext);
    out.push(PathBuf::from(with_ext));
  }
  out
}
