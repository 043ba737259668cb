mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{RebuildOpts, XcodebuildOpts};

/// Incremental archive rebuilds for Xcode projects
#[derive(Parser)]
#[command(name = "xcarchive")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Print machine-readable JSON
  #[arg(long, global = true)]
  json: bool,

  /// Directory for cached build settings (default: $XCARCHIVE_CACHE_DIR or ~/.cache/xcarchive)
  #[arg(long, global = true, value_name = "DIR")]
  cache_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Show which targets would be rebuilt
  Plan {
    #[command(flatten)]
    opts: RebuildOpts,
  },

  /// Rebuild the project if any target is stale
  Build {
    #[command(flatten)]
    opts: RebuildOpts,

    /// Derived data directory passed to xcodebuild
    #[arg(long, value_name = "DIR", default_value = "DerivedData")]
    derived_data: PathBuf,
  },

  /// Print the build settings xcodebuild reports for a project
  Settings {
    /// Path to the .xcodeproj
    project: PathBuf,

    /// Only show this target
    #[arg(short, long)]
    target: Option<String>,

    /// Only show identity settings
    #[arg(long)]
    identity: bool,

    /// Identity key (repeatable; replaces the default set)
    #[arg(long = "identity-key", value_name = "KEY")]
    identity_keys: Vec<String>,

    #[command(flatten)]
    xcodebuild: XcodebuildOpts,
  },

  /// Show paths and version information
  Info,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let cache_dir = cli.cache_dir.as_deref();

  match cli.command {
    Commands::Plan { opts } => cmd::cmd_plan(&opts, cache_dir, cli.verbose, cli.json),
    Commands::Build { opts, derived_data } => cmd::cmd_build(&opts, &derived_data, cache_dir, cli.json),
    Commands::Settings {
      project,
      target,
      identity,
      identity_keys,
      xcodebuild,
    } => cmd::cmd_settings(&project, target.as_deref(), identity, &identity_keys, &xcodebuild, cli.json),
    Commands::Info => cmd::cmd_info(cache_dir, cli.json),
  }
}
