//! Terminal output for the `compile` and `resolve` commands.
//!
//! Status lines go to stdout, failures to stderr. Paths are shown relative to
//! the environment root where possible.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use stylepack_lib::emit::EmitSummary;

/// Digest characters shown next to a compiled bundle.
const DIGEST_WIDTH: usize = 12;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const COMPILED: &str = "✓";
  pub const FAILED: &str = "✗";
  pub const SOURCE: &str = "•";
  pub const DIRECTORY: &str = "→";
}

/// Bundle sizes: stylesheets rarely reach a megabyte, so two units suffice.
pub fn format_size(bytes: u64) -> String {
  const KB: u64 = 1024;
  const MB: u64 = KB * 1024;

  match bytes {
    b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
    b if b >= KB => format!("{:.1} KB", b as f64 / KB as f64),
    b => format!("{b} B"),
  }
}

pub fn format_elapsed(elapsed: Duration) -> String {
  if elapsed.as_secs() > 0 {
    format!("{:.2}s", elapsed.as_secs_f64())
  } else {
    format!("{}ms", elapsed.as_millis())
  }
}

/// `path` relative to `root`, `.` for the root itself, or unchanged when outside it.
pub fn relative_display(path: &Path, root: &Path) -> String {
  match path.strip_prefix(root) {
    Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
    Ok(rel) => rel.display().to_string(),
    Err(_) => path.display().to_string(),
  }
}

/// One line for a published bundle: name, short digest, size and source count.
pub fn compiled_line(name: &str, summary: &EmitSummary) -> String {
  let noun = if summary.sources == 1 { "source" } else { "sources" };
  format!(
    "{} {} ({}, {} {})",
    name,
    summary.digest.short(DIGEST_WIDTH),
    format_size(summary.size),
    summary.sources,
    noun
  )
}

pub fn print_compiled(name: &str, summary: &EmitSummary) {
  println!(
    "{} {}",
    symbols::COMPILED.if_supports_color(Stream::Stdout, |s| s.green()),
    compiled_line(name, summary)
  );
}

pub fn print_failed(message: &str) {
  eprintln!(
    "{} {}",
    symbols::FAILED.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

/// Bundle heading for `resolve`.
pub fn print_bundle_heading(name: &str, sources: usize) {
  if sources == 0 {
    println!("{} has no sources", name.if_supports_color(Stream::Stdout, |s| s.bold()));
  } else {
    println!(
      "{} ({} sources)",
      name.if_supports_color(Stream::Stdout, |s| s.bold()),
      sources
    );
  }
}

pub fn print_source(path: &Path, root: &Path) {
  println!(
    "  {} {}",
    symbols::SOURCE.if_supports_color(Stream::Stdout, |s| s.blue()),
    relative_display(path, root)
  );
}

pub fn print_directory(path: &Path, root: &Path) {
  println!(
    "  {} {}",
    symbols::DIRECTORY.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    relative_display(path, root)
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
