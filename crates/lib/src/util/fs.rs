//! Filesystem access used by resolution and emission.
//!
//! Resolution only ever reads. Emission publishes through [`write_atomic`], which
//! stages the bytes in a sibling temporary file and renames it over the target,
//! so readers observe either the previous artifact or the complete new one.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::trace;

/// What a path points at, following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
  pub is_dir: bool,
  pub is_file: bool,
}

/// Stat a path. Returns `None` when nothing exists there (or it cannot be read).
pub fn stat(path: &Path) -> Option<Stat> {
  fs::metadata(path).ok().map(|meta| Stat {
    is_dir: meta.is_dir(),
    is_file: meta.is_file(),
  })
}

/// Names of the entries directly inside `dir`, sorted byte-wise.
pub fn list_entries(dir: &Path) -> io::Result<Vec<OsString>> {
  let mut names = fs::read_dir(dir)?
    .map(|entry| entry.map(|e| e.file_name()))
    .collect::<io::Result<Vec<_>>>()?;
  names.sort();
  Ok(names)
}

pub fn read_file(path: &Path) -> io::Result<Vec<u8>> {
  fs::read(path)
}

/// Write `bytes` to `path` atomically, creating the parent directory if needed.
///
/// The staging file lives in the target's directory so the final rename never
/// crosses filesystems. If anything fails the staging file is removed when it
/// is dropped.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };
  fs::create_dir_all(dir)?;

  let mut staged = NamedTempFile::new_in(dir)?;
  trace!(staged = %staged.path().display(), target = %path.display(), "staging write");
  staged.write_all(bytes)?;
  staged.as_file().sync_all()?;
  staged.persist(path).map_err(|e| e.error)?;
  Ok(())
}

/// Remove a file. Returns `false` if it was already gone.
pub fn delete_file(path: &Path) -> io::Result<bool> {
  match fs::remove_file(path) {
    Ok(()) => Ok(true),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
    Err(e) => Err(e),
  }
}
