//! Implementation of the `xcarchive build` command.
//!
//! Plans like `xcarchive plan`, runs xcodebuild once if anything is stale and
//! caches the current build settings after a successful run.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use xcarchive_lib::build::{BuildOutcome, BuildTarget, Performer};

use super::RebuildOpts;
use super::plan::{Prepared, prepare};
use crate::output::{print_info, print_json, print_success};

pub fn cmd_build(opts: &RebuildOpts, derived_data: &Path, cache_dir: Option<&Path>, json: bool) -> Result<()> {
  let Prepared {
    manifest,
    graph,
    executor,
    store,
    plan,
  } = prepare(opts, cache_dir)?;

  let target = BuildTarget::new(&manifest.project, &manifest.target);
  let performer = Performer::new(&executor, derived_data);

  let outcome = performer
    .rebuild_missing(&target, &graph)
    .with_context(|| format!("Failed to build scheme {}", manifest.target))?;

  let snapshot_path = store
    .save(&plan.snapshot)
    .context("Failed to cache build settings")?;
  debug!(path = %snapshot_path.display(), "cached build settings");

  if json {
    let json_output = serde_json::json!({
      "project": manifest.project,
      "scheme": manifest.target,
      "outcome": outcome,
      "settings_cache": snapshot_path,
    });
    return print_json(&json_output);
  }

  match outcome {
    BuildOutcome::UpToDate => print_success("Everything is up to date"),
    BuildOutcome::Rebuilt { targets } => {
      print_success(&format!("Rebuilt {} ({} stale target(s))", manifest.target, targets.len()));
    }
  }
  print_info(&format!("Settings cached at {}", snapshot_path.display()));

  Ok(())
}
