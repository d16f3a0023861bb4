//! Configuration loading.
//!
//! A `stylepack.yaml` file declares where assets live, where compiled bundles go
//! and the dependency tokens of every bundle:
//!
//! ```yaml
//! root: theme
//! output: compiled/stylesheets
//! search_paths: [vendor]
//! stylesheets:
//!   screen: [base.css, ./widgets/*, ./vendor/**/*]
//! ```
//!
//! Relative paths are interpreted against the directory containing the file.
//! Two bundles may not share an output file name (`screen` and `screen.css`).

use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::bundle::BundleSpec;
use crate::compile::CompileRecord;
use crate::consts::{DEFAULT_EXTENSION, PARALLELISM_ENV};
use crate::emit::EmitOptions;
use crate::env::AssetEnvironment;
use crate::util::path::normalize;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse config: {0}")]
  Parse(#[from] serde_yaml::Error),

  #[error("invalid config: {0}")]
  Invalid(String),
}

/// On-disk form of the configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
  #[serde(default)]
  root: Option<PathBuf>,
  #[serde(default)]
  output: Option<PathBuf>,
  #[serde(default)]
  search_paths: Vec<PathBuf>,
  #[serde(default)]
  extensions: Option<Vec<String>>,
  #[serde(default)]
  default_extension: Option<String>,
  #[serde(default)]
  parallelism: Option<usize>,
  #[serde(default)]
  newline_separated: bool,
  #[serde(default)]
  stylesheets: BTreeMap<String, Vec<String>>,
}

/// Validated configuration with absolute paths.
#[derive(Debug, Clone)]
pub struct Config {
  /// Environment root. Bundles are declared here.
  pub root: PathBuf,
  /// Directory compiled bundles are written to.
  pub output: PathBuf,
  /// Search roots after `root`, in order.
  pub search_paths: Vec<PathBuf>,
  /// Requirable extensions, without dots.
  pub extensions: Vec<String>,
  /// Maximum number of bundles compiled at once.
  pub parallelism: usize,
  pub emit: EmitOptions,
  /// Bundles in name order.
  pub bundles: Vec<BundleSpec>,
}

impl Config {
  /// Load and validate a configuration file.
  ///
  /// `STYLEPACK_PARALLELISM`, when set to a positive integer, overrides the
  /// configured parallelism.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let base = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let base = dunce::canonicalize(base).map_err(|source| ConfigError::Read {
      path: base.to_path_buf(),
      source,
    })?;

    debug!(path = %path.display(), "loading config");
    Self::from_yaml(&content, &base)
  }

  /// Parse configuration text, resolving relative paths against `base_dir`.
  pub fn from_yaml(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
    let raw: RawConfig = serde_yaml::from_str(content)?;
    let absolute = |p: PathBuf| normalize(&base_dir.join(p));

    let default_extension = raw
      .default_extension
      .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
      .trim_start_matches('.')
      .to_string();
    if default_extension.is_empty() {
      return Err(ConfigError::Invalid("default_extension must not be empty".to_string()));
    }

    let extensions = raw.extensions.unwrap_or_else(|| vec![default_extension.clone()]);
    if extensions.is_empty() {
      return Err(ConfigError::Invalid("extensions must list at least one extension".to_string()));
    }

    let parallelism = match parallelism_override() {
      Some(n) => n,
      None => raw.parallelism.unwrap_or_else(num_cpus),
    };
    if parallelism == 0 {
      return Err(ConfigError::Invalid("parallelism must be at least 1".to_string()));
    }

    let mut bundles = Vec::with_capacity(raw.stylesheets.len());
    let mut file_names = HashSet::new();
    for (name, tokens) in raw.stylesheets {
      validate_bundle_name(&name)?;
      let bundle = BundleSpec::new(name, tokens).with_default_extension(&default_extension);
      if !file_names.insert(bundle.file_name()) {
        return Err(ConfigError::Invalid(format!(
          "bundle '{}' compiles to {}, which another bundle already writes",
          bundle.name,
          bundle.file_name()
        )));
      }
      bundles.push(bundle);
    }

    Ok(Self {
      root: absolute(raw.root.unwrap_or_else(|| PathBuf::from("."))),
      output: absolute(raw.output.unwrap_or_else(|| PathBuf::from("compiled"))),
      search_paths: raw.search_paths.into_iter().map(absolute).collect(),
      extensions,
      parallelism,
      emit: EmitOptions {
        newline_separated: raw.newline_separated,
      },
      bundles,
    })
  }

  /// The asset environment described by this configuration.
  ///
  /// Compiled bundles and the compile record are excluded from walks, as is the
  /// whole output directory unless it contains the root.
  pub fn environment(&self) -> AssetEnvironment {
    let mut env = self
      .search_paths
      .iter()
      .fold(AssetEnvironment::new(&self.root), |env, path| env.append_path(path))
      .with_extensions(self.extensions.iter().cloned());

    if !self.root.starts_with(&self.output) {
      env = env.exclude(&self.output);
    }
    for bundle in &self.bundles {
      env = env.exclude(self.output_path(bundle));
    }
    env.exclude(CompileRecord::path(&self.output))
  }

  pub fn bundle(&self, name: &str) -> Option<&BundleSpec> {
    self
      .bundles
      .iter()
      .find(|b| b.name == name || b.file_name() == name)
  }

  /// Where the compiled form of `bundle` is written.
  pub fn output_path(&self, bundle: &BundleSpec) -> PathBuf {
    self.output.join(bundle.file_name())
  }
}

fn validate_bundle_name(name: &str) -> Result<(), ConfigError> {
  if name.trim().is_empty() {
    return Err(ConfigError::Invalid("bundle name must not be empty".to_string()));
  }
  if name.contains(['/', '\\']) || name == "." || name == ".." {
    return Err(ConfigError::Invalid(format!(
      "bundle name '{name}' must be a plain file name"
    )));
  }
  Ok(())
}

fn parallelism_override() -> Option<usize> {
  let value = std::env::var(PARALLELISM_ENV).ok()?;
  match value.trim().parse::<usize>() {
    Ok(n) if n > 0 => Some(n),
    _ => {
      warn!(var = PARALLELISM_ENV, value = %value, "ignoring invalid parallelism override");
      None
    }
  }
}

/// Get the number of CPUs for default parallelism.
fn num_cpus() -> usize {
  std::thread::available_parallelism().map(|p| p.get()).unwrap_or(4)
}
