//! The compile record written next to compiled bundles.
//!
//! # Storage Layout
//!
//! ```text
//! {output}/
//! ├── manifest.json   # CompileRecord: one entry per compiled bundle
//! ├── screen.css
//! └── print.css
//! ```
//!
//! Source and dependency paths are stored relative to the environment root when
//! they lie inside it, so the record is stable across checkouts.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{RECORD_FILENAME, RECORD_VERSION};
use crate::emit::EmitSummary;
use crate::resolve::ResolvedManifest;
use crate::util::fs::{read_file, write_atomic};
use crate::util::hash::ContentHash;

#[derive(Debug, Error)]
pub enum RecordError {
  #[error("failed to read compile record: {0}")]
  Read(#[source] io::Error),

  #[error("failed to write compile record: {0}")]
  Write(#[source] io::Error),

  #[error("failed to parse compile record: {0}")]
  Parse(#[source] serde_json::Error),

  #[error("failed to serialize compile record: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("unsupported compile record version: {0}")]
  UnsupportedVersion(u32),
}

/// One compiled bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEntry {
  /// Output file name inside the output directory.
  pub output: String,
  pub digest: ContentHash,
  pub size: u64,
  pub sources: Vec<PathBuf>,
  pub dependencies: Vec<PathBuf>,
}

impl RecordEntry {
  pub fn new(manifest: &ResolvedManifest, summary: &EmitSummary, root: &Path) -> Self {
    let output = summary
      .output
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_default();

    Self {
      output,
      digest: summary.digest.clone(),
      size: summary.size,
      sources: manifest.files.iter().map(|p| relative_to(root, p)).collect(),
      dependencies: manifest.dependencies.iter().map(|p| relative_to(root, p)).collect(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileRecord {
  pub version: u32,
  pub bundles: BTreeMap<String, RecordEntry>,
}

impl Default for CompileRecord {
  fn default() -> Self {
    Self {
      version: RECORD_VERSION,
      bundles: BTreeMap::new(),
    }
  }
}

impl CompileRecord {
  pub fn path(output_dir: &Path) -> PathBuf {
    output_dir.join(RECORD_FILENAME)
  }

  /// Load the record in `output_dir`. Returns `Ok(None)` if none was written yet.
  pub fn load(output_dir: &Path) -> Result<Option<Self>, RecordError> {
    let content = match read_file(&Self::path(output_dir)) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(RecordError::Read(e)),
    };

    let record: CompileRecord = serde_json::from_slice(&content).map_err(RecordError::Parse)?;
    if record.version != RECORD_VERSION {
      return Err(RecordError::UnsupportedVersion(record.version));
    }
    Ok(Some(record))
  }

  /// Write the record atomically into `output_dir`.
  pub fn save(&self, output_dir: &Path) -> Result<PathBuf, RecordError> {
    let path = Self::path(output_dir);
    let mut content = serde_json::to_vec_pretty(self).map_err(RecordError::Serialize)?;
    content.push(b'\n');
    write_atomic(&path, &content).map_err(RecordError::Write)?;
    Ok(path)
  }
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
  match path.strip_prefix(root) {
    Ok(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
    Ok(rel) => rel.to_path_buf(),
    Err(_) => path.to_path_buf(),
  }
}
