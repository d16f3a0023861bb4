//! Implementation of the `stylepack resolve` command.

use std::path::Path;

use anyhow::{Context, Result};

use stylepack_lib::compile::resolve_bundle;
use stylepack_lib::config::Config;

use crate::output::{OutputFormat, print_bundle_heading, print_directory, print_json, print_source};

/// Print the ordered sources of one bundle. Nothing is written to disk.
///
/// Directory dependencies are listed too when `verbose` is set; JSON output
/// always carries them.
pub fn cmd_resolve(config_path: &Path, bundle: &str, verbose: bool, format: OutputFormat) -> Result<()> {
  let config = Config::load(config_path).with_context(|| format!("Failed to load config {}", config_path.display()))?;
  let manifest = resolve_bundle(&config, bundle)?;

  if format.is_json() {
    return print_json(&manifest);
  }

  print_bundle_heading(&manifest.bundle, manifest.files.len());
  for file in &manifest.files {
    print_source(file, &config.root);
  }

  if verbose && !manifest.dependencies.is_empty() {
    println!();
    println!("Directories:");
    for dir in &manifest.dependencies {
      print_directory(dir, &config.root);
    }
  }

  Ok(())
}
