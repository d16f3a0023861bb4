//! Writing a resolved bundle to disk.
//!
//! Sources are concatenated in manifest order without any transformation and the
//! result is published atomically: consumers see the previous artifact or the
//! complete new one, never a partial write. Staging files are removed whether
//! or not the publish succeeds.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::resolve::ResolvedManifest;
use crate::util::fs::{read_file, write_atomic};
use crate::util::hash::{ContentHash, hash_bytes};

#[derive(Debug, Error)]
pub enum EmitError {
  #[error("failed to read source {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write bundle {}: {source}", .path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmitOptions {
  /// Append a newline after any non-empty source that does not end in one.
  pub newline_separated: bool,
}

/// What was published for one bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmitSummary {
  pub output: PathBuf,
  pub digest: ContentHash,
  pub size: u64,
  pub sources: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Emitter {
  options: EmitOptions,
}

impl Emitter {
  pub fn new(options: EmitOptions) -> Self {
    Self { options }
  }

  /// Concatenate the manifest's files and publish them at `output`.
  ///
  /// Every source is read before anything is written, so a missing source leaves
  /// any existing artifact untouched.
  pub fn emit(&self, manifest: &ResolvedManifest, output: &Path) -> Result<EmitSummary, EmitError> {
    let body = self.concatenate(manifest)?;

    write_atomic(output, &body).map_err(|source| EmitError::Write {
      path: output.to_path_buf(),
      source,
    })?;

    let summary = EmitSummary {
      output: output.to_path_buf(),
      digest: hash_bytes(&body),
      size: body.len() as u64,
      sources: manifest.files.len(),
    };

    info!(
      bundle = %manifest.bundle,
      output = %output.display(),
      size = summary.size,
      digest = %summary.digest.short(12),
      "published bundle"
    );

    Ok(summary)
  }

  /// The bundle body, in memory.
  pub fn concatenate(&self, manifest: &ResolvedManifest) -> Result<Vec<u8>, EmitError> {
    let mut body = Vec::new();
    for file in &manifest.files {
      let content = read_file(file).map_err(|source| EmitError::Read {
        path: file.clone(),
        source,
      })?;
      debug!(bundle = %manifest.bundle, file = %file.display(), bytes = content.len(), "appending source");

      let needs_newline = self.options.newline_separated && content.last().is_some_and(|b| *b != b'\n');
      body.extend_from_slice(&content);
      if needs_newline {
        body.push(b'\n');
      }
    }
    Ok(body)
  }
}
