//! Implementation of the `stylepack compile` command.
//!
//! Loads the configuration, compiles the selected bundles and prints one line
//! per bundle. The command fails if any bundle failed, after every other bundle
//! has been published.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{info, warn};

use stylepack_lib::compile::compile;
use stylepack_lib::config::Config;

use crate::output::{OutputFormat, format_elapsed, print_compiled, print_failed, print_json, print_stat};

#[derive(Serialize)]
struct CompiledOutput {
  bundle: String,
  output: PathBuf,
  digest: String,
  size: u64,
  sources: usize,
}

#[derive(Serialize)]
struct FailedOutput {
  bundle: String,
  error: String,
}

#[derive(Serialize)]
struct CompileOutput {
  compiled: Vec<CompiledOutput>,
  failed: Vec<FailedOutput>,
  record: Option<PathBuf>,
  elapsed_ms: u128,
}

/// Execute the compile command.
///
/// `bundles` restricts the run to the named bundles; an empty list compiles all
/// of them. `out_dir` and `jobs` override the configured output directory and
/// parallelism.
pub fn cmd_compile(
  config_path: &Path,
  bundles: &[String],
  out_dir: Option<PathBuf>,
  jobs: Option<usize>,
  format: OutputFormat,
) -> Result<()> {
  let mut config =
    Config::load(config_path).with_context(|| format!("Failed to load config {}", config_path.display()))?;

  if let Some(dir) = out_dir {
    config.output = std::path::absolute(&dir).with_context(|| format!("Invalid output directory {}", dir.display()))?;
  }
  if let Some(jobs) = jobs {
    if jobs == 0 {
      bail!("--jobs must be at least 1");
    }
    config.parallelism = jobs;
  }

  info!(
    bundles = config.bundles.len(),
    parallelism = config.parallelism,
    output = %config.output.display(),
    "compiling"
  );

  let started = Instant::now();
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt.block_on(async {
    tokio::select! {
      report = compile(&config, bundles) => Ok(report),
      _ = tokio::signal::ctrl_c() => Err(anyhow::anyhow!("Interrupted")),
    }
  })?;
  let report = report.context("Compile failed")?;
  let elapsed = started.elapsed();

  if format.is_json() {
    print_json(&CompileOutput {
      compiled: report
        .compiled()
        .map(|(name, compiled)| CompiledOutput {
          bundle: name.clone(),
          output: compiled.summary.output.clone(),
          digest: compiled.summary.digest.0.clone(),
          size: compiled.summary.size,
          sources: compiled.summary.sources,
        })
        .collect(),
      failed: report
        .failed()
        .map(|(name, err)| FailedOutput {
          bundle: name.clone(),
          error: err.to_string(),
        })
        .collect(),
      record: report.record.clone(),
      elapsed_ms: elapsed.as_millis(),
    })?;
  } else {
    for (name, compiled) in report.compiled() {
      print_compiled(name, &compiled.summary);
      if compiled.manifest.is_empty() {
        warn!(bundle = %name, "bundle has no sources");
      }
    }
    for (_, err) in report.failed() {
      print_failed(&err.to_string());
    }
    println!();
    print_stat("Compiled", &report.compiled().count().to_string());
    print_stat("Failed", &report.failed().count().to_string());
    if let Some(record) = &report.record {
      print_stat("Record", &record.display().to_string());
    }
    print_stat("Elapsed", &format_elapsed(elapsed));
  }

  let failed = report.failed().count();
  if failed > 0 {
    bail!("{} bundle(s) failed to compile", failed);
  }

  Ok(())
}
