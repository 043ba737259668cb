//! Implementation of the `xcarchive plan` command.
//!
//! Loads the project's build settings, compares them with the cached ones
//! and reports which targets a `build` would rebuild. Nothing is built and
//! the cache is left untouched.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use xcarchive_lib::build::{RebuildPlan, plan_rebuild};
use xcarchive_lib::graph::{BuildGraph, GraphManifest, should_rebuild};
use xcarchive_lib::settings::{SettingsLoader, SettingsStore};
use xcarchive_lib::xcodebuild::Executor;

use super::{RebuildOpts, loader_config, settings_store};
use crate::output::{print_info, print_json, print_stat, print_success, symbols};

/// Everything a `plan` or `build` run works on.
pub(crate) struct Prepared {
  pub manifest: GraphManifest,
  pub graph: BuildGraph,
  pub executor: Executor,
  pub store: SettingsStore,
  pub plan: RebuildPlan,
}

pub(crate) fn prepare(opts: &RebuildOpts, cache_dir: Option<&Path>) -> Result<Prepared> {
  let manifest = GraphManifest::from_path(&opts.manifest)
    .with_context(|| format!("Failed to load graph manifest: {}", opts.manifest.display()))?;
  let mut graph = manifest.to_graph().context("Invalid graph manifest")?;

  let executor = Executor::new(opts.xcodebuild.executor_config()).context("Failed to set up xcodebuild")?;
  let store = settings_store(cache_dir);

  let plan = {
    let mut loader = SettingsLoader::with_config(&executor, loader_config(&opts.identity_keys));
    plan_rebuild(
      &mut loader,
      &store,
      &mut graph,
      &manifest.project,
      &executor.arguments_state(),
      &opts.force,
    )
    .with_context(|| format!("Failed to plan rebuild for {}", manifest.project.display()))?
  };

  Ok(Prepared {
    manifest,
    graph,
    executor,
    store,
    plan,
  })
}

#[derive(Serialize)]
pub(crate) struct TargetStatus {
  pub name: String,
  pub rebuild: bool,
  pub cause: Option<String>,
}

pub(crate) fn target_statuses(graph: &BuildGraph) -> Vec<TargetStatus> {
  graph
    .nodes()
    .map(|node| TargetStatus {
      name: node.name().to_string(),
      rebuild: node.rebuild(),
      cause: node.cause().map(ToString::to_string),
    })
    .collect()
}

pub fn cmd_plan(opts: &RebuildOpts, cache_dir: Option<&Path>, verbose: bool, json: bool) -> Result<()> {
  let prepared = prepare(opts, cache_dir)?;
  let Prepared {
    manifest, graph, plan, ..
  } = &prepared;

  if json {
    let json_output = serde_json::json!({
      "project": manifest.project,
      "scheme": manifest.target,
      "arguments_state": plan.snapshot.arguments_state,
      "should_rebuild": should_rebuild(graph),
      "diff": plan.diff,
      "targets": target_statuses(graph),
    });
    return print_json(&json_output);
  }

  print_info(&format!("Project: {}", manifest.project.display()));
  print_stat("Scheme", &manifest.target);
  print_stat("Targets", &graph.len().to_string());
  print_stat("Changed", &plan.diff.changed.len().to_string());
  print_stat("New", &plan.diff.added.len().to_string());
  if verbose {
    print_stat("Unchanged", &plan.diff.unchanged.len().to_string());
    print_stat("Removed", &plan.diff.removed.len().to_string());
  }
  println!();

  if !should_rebuild(graph) {
    print_success("Everything is up to date");
    return Ok(());
  }

  println!("Would rebuild {} target(s):", plan.marked);
  for status in target_statuses(graph) {
    if let Some(cause) = status.cause {
      println!("  {} {} ({})", symbols::MODIFY, status.name, cause);
    } else if verbose {
      println!("  {} {}", symbols::UNCHANGED, status.name);
    }
  }

  Ok(())
}
