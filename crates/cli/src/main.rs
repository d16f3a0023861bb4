mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stylepack_lib::consts::CONFIG_FILENAME;

use crate::output::OutputFormat;

/// stylepack - directive-driven stylesheet bundler
#[derive(Parser)]
#[command(name = "stylepack")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Path to the configuration file
  #[arg(short, long, global = true, default_value = CONFIG_FILENAME)]
  config: PathBuf,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Compile bundles into the output directory
  Compile {
    /// Bundles to compile (default: all configured bundles)
    bundles: Vec<String>,

    /// Override the configured output directory
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Maximum number of bundles compiled at once
    #[arg(short, long)]
    jobs: Option<usize>,
  },

  /// Print the resolved sources of a bundle without compiling it
  Resolve {
    /// Bundle name
    bundle: String,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  // Initialize logging
  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Compile { bundles, out_dir, jobs } => cmd::cmd_compile(&cli.config, &bundles, out_dir, jobs, cli.output),
    Commands::Resolve { bundle } => cmd::cmd_resolve(&cli.config, &bundle, cli.verbose, cli.output),
  }
}
