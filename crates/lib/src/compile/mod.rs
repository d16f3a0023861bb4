//! Compiling every configured bundle.
//!
//! This module provides the entry points the hosting program drives. It handles:
//! - Resolving then emitting each bundle inside its own worker task
//! - Bounding the number of bundles in flight with a semaphore
//! - Collecting a per-bundle outcome so one failure never blocks the rest
//! - Updating the compile record once all bundles are done
//!
//! Dropping the future returned by [`compile`] aborts bundles that have not
//! started yet. Bundles already emitting finish on the blocking pool; their
//! output is published atomically, so an abandoned run never leaves a partial
//! bundle behind.

pub mod record;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::bundle::BundleSpec;
use crate::config::Config;
use crate::emit::{EmitError, EmitSummary, Emitter};
use crate::resolve::{BundleError, ResolvedManifest, Resolver};
use crate::util::fs::delete_file;

pub use record::{CompileRecord, RecordEntry, RecordError};

#[derive(Debug, Error)]
pub enum CompileError {
  /// A directive of the bundle could not be resolved.
  #[error(transparent)]
  Resolve(#[from] BundleError),

  /// The bundle resolved but could not be written.
  #[error("bundle '{bundle}': {source}")]
  Emit {
    bundle: String,
    #[source]
    source: EmitError,
  },

  /// The worker task compiling the bundle did not finish.
  #[error("bundle '{bundle}': worker task failed: {message}")]
  Task { bundle: String, message: String },

  /// A bundle was requested that the configuration does not declare.
  #[error("unknown bundle: {0}")]
  UnknownBundle(String),

  /// The compile record could not be updated.
  #[error(transparent)]
  Record(#[from] RecordError),
}

/// A bundle that was resolved and published.
#[derive(Debug, Clone)]
pub struct CompiledBundle {
  pub manifest: ResolvedManifest,
  pub summary: EmitSummary,
}

#[derive(Debug)]
pub enum BundleOutcome {
  Compiled(CompiledBundle),
  Failed(CompileError),
}

/// Result of a compile run.
#[derive(Debug, Default)]
pub struct CompileReport {
  /// Outcome per bundle name.
  pub outcomes: BTreeMap<String, BundleOutcome>,
  /// Where the compile record was written.
  pub record: Option<PathBuf>,
}

impl CompileReport {
  /// Returns true if every bundle compiled.
  pub fn is_success(&self) -> bool {
    self.failed().next().is_none()
  }

  pub fn compiled(&self) -> impl Iterator<Item = (&String, &CompiledBundle)> {
    self.outcomes.iter().filter_map(|(name, outcome)| match outcome {
      BundleOutcome::Compiled(compiled) => Some((name, compiled)),
      BundleOutcome::Failed(_) => None,
    })
  }

  pub fn failed(&self) -> impl Iterator<Item = (&String, &CompileError)> {
    self.outcomes.iter().filter_map(|(name, outcome)| match outcome {
      BundleOutcome::Failed(err) => Some((name, err)),
      BundleOutcome::Compiled(_) => None,
    })
  }
}

/// Resolve one configured bundle without writing anything.
pub fn resolve_bundle(config: &Config, name: &str) -> Result<ResolvedManifest, CompileError> {
  let bundle = config
    .bundle(name)
    .ok_or_else(|| CompileError::UnknownBundle(name.to_string()))?;
  Ok(Resolver::new(config.environment()).resolve(bundle)?)
}

/// Resolve and emit a single bundle. Resolution completes before emission starts.
pub fn compile_bundle(
  resolver: &Resolver,
  emitter: &Emitter,
  bundle: &BundleSpec,
  output: &Path,
) -> Result<CompiledBundle, CompileError> {
  let manifest = resolver.resolve(bundle)?;
  let summary = emitter.emit(&manifest, output).map_err(|source| CompileError::Emit {
    bundle: bundle.name.clone(),
    source,
  })?;
  Ok(CompiledBundle { manifest, summary })
}

/// Compile the configured bundles, at most `config.parallelism` at a time.
///
/// `only` restricts the run to the named bundles; an empty slice compiles all of
/// them. Bundle failures are reported in the returned [`CompileReport`]; an `Err`
/// means the run itself could not proceed (unknown bundle, unwritable record).
pub async fn compile(config: &Config, only: &[String]) -> Result<CompileReport, CompileError> {
  let selected = select_bundles(config, only)?;

  info!(
    bundles = selected.len(),
    parallelism = config.parallelism,
    output = %config.output.display(),
    "starting compile"
  );

  let resolver = Resolver::new(config.environment());
  let emitter = Emitter::new(config.emit);
  let semaphore = Arc::new(Semaphore::new(config.parallelism));

  let mut join_set = JoinSet::new();
  let mut task_names = HashMap::new();

  for bundle in selected {
    let bundle = bundle.clone();
    let name = bundle.name.clone();
    let output = config.output_path(&bundle);
    let resolver = resolver.clone();
    let emitter = emitter.clone();
    let semaphore = semaphore.clone();

    let handle = join_set.spawn(async move {
      let name = bundle.name.clone();

      // Acquire semaphore permit inside the task
      let _permit = match semaphore.acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
          let err = CompileError::Task {
            bundle: name.clone(),
            message: e.to_string(),
          };
          return (name, Err(err));
        }
      };

      debug!(bundle = %name, "compiling bundle");
      let task_name = name.clone();
      let result = tokio::task::spawn_blocking(move || compile_bundle(&resolver, &emitter, &bundle, &output))
        .await
        .unwrap_or_else(|e| {
          Err(CompileError::Task {
            bundle: task_name,
            message: e.to_string(),
          })
        });

      (name, result)
    });
    task_names.insert(handle.id(), name);
  }

  let mut report = CompileReport::default();

  while let Some(joined) = join_set.join_next_with_id().await {
    let (name, result) = match joined {
      Ok((_, outcome)) => outcome,
      Err(e) => {
        // Task panicked or was cancelled
        let name = task_names.get(&e.id()).cloned().unwrap_or_default();
        let err = CompileError::Task {
          bundle: name.clone(),
          message: e.to_string(),
        };
        (name, Err(err))
      }
    };

    let outcome = match result {
      Ok(compiled) => {
        info!(bundle = %name, files = compiled.manifest.files.len(), "bundle compiled");
        BundleOutcome::Compiled(compiled)
      }
      Err(e) => {
        error!(bundle = %name, error = %e, "bundle failed");
        BundleOutcome::Failed(e)
      }
    };
    report.outcomes.insert(name, outcome);
  }

  let record = update_record(config, &report);
  report.record = Some(record.save(&config.output)?);

  info!(
    compiled = report.compiled().count(),
    failed = report.failed().count(),
    "compile complete"
  );

  Ok(report)
}

fn select_bundles<'a>(config: &'a Config, only: &[String]) -> Result<Vec<&'a BundleSpec>, CompileError> {
  if only.is_empty() {
    return Ok(config.bundles.iter().collect());
  }
  let mut seen = HashSet::new();
  let mut selected = Vec::new();
  for name in only {
    let bundle = config
      .bundle(name)
      .ok_or_else(|| CompileError::UnknownBundle(name.clone()))?;
    if seen.insert(bundle.name.as_str()) {
      selected.push(bundle);
    }
  }
  Ok(selected)
}

/// Merge this run into the existing record.
///
/// Bundles compiled now get fresh entries. Configured bundles that failed or were
/// not part of the run keep their previous entry, since their previous output is
/// still on disk. Entries for bundles no longer configured are dropped.
fn update_record(config: &Config, report: &CompileReport) -> CompileRecord {
  let mut record = match CompileRecord::load(&config.output) {
    Ok(existing) => existing.unwrap_or_default(),
    Err(e) => {
      warn!(error = %e, "discarding unreadable compile record");
      CompileRecord::default()
    }
  };

  let configured: HashSet<&str> = config.bundles.iter().map(|b| b.name.as_str()).collect();
  let stale: Vec<String> = record
    .bundles
    .keys()
    .filter(|name| !configured.contains(name.as_str()))
    .cloned()
    .collect();
  for name in stale {
    debug!(bundle = %name, "removing stale bundle from compile record");
    if let Some(entry) = record.bundles.remove(&name) {
      remove_stale_output(config, &name, &entry.output);
    }
  }

  for (name, compiled) in report.compiled() {
    record.bundles.insert(
      name.clone(),
      RecordEntry::new(&compiled.manifest, &compiled.summary, &config.root),
    );
  }

  record
}

/// Delete the published file of a bundle that is no longer configured, unless a
/// configured bundle now writes the same file.
fn remove_stale_output(config: &Config, bundle: &str, output: &str) {
  let plain = Path::new(output).file_name().is_some_and(|n| n == output);
  if !plain || config.bundles.iter().any(|b| b.file_name() == output) {
    return;
  }
  let path = config.output.join(output);
  match delete_file(&path) {
    Ok(true) => info!(bundle = %bundle, path = %path.display(), "removed stale bundle output"),
    Ok(false) => {}
    Err(e) => warn!(bundle = %bundle, path = %path.display(), error = %e, "failed to remove stale bundle output"),
  }
}
