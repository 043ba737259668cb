//! Incremental rebuild planning.
//!
//! Loads the current settings of a project, compares them with the stored
//! snapshot and propagates the resulting signals through the graph. The
//! caller decides whether to build and, after a successful build, saves
//! `RebuildPlan::snapshot` so the next run compares against it.

use std::path::Path;

use tracing::info;

use crate::graph::{BuildGraph, GraphError, LocalReason, propagate};
use crate::settings::{
  LoadReport, SettingsDiff, SettingsLoader, SettingsSnapshot, SettingsSource, SettingsStore, diff_settings,
};

use super::types::BuildError;

/// What `plan_rebuild` found.
#[derive(Debug, Clone)]
pub struct RebuildPlan {
  /// Effect of the settings load on the loader cache.
  pub load: LoadReport,

  /// Stored vs current settings.
  pub diff: SettingsDiff,

  /// Current settings, to be stored after a successful build.
  pub snapshot: SettingsSnapshot,

  /// Number of graph nodes marked for rebuild.
  pub marked: usize,
}

/// Load settings for `project_path`, diff them against the store and mark `graph`.
///
/// `requested` names targets to rebuild regardless of their settings, such as
/// targets whose cached products are missing.
pub fn plan_rebuild<S: SettingsSource>(
  loader: &mut SettingsLoader<S>,
  store: &SettingsStore,
  graph: &mut BuildGraph,
  project_path: &Path,
  arguments_state: &str,
  requested: &[String],
) -> Result<RebuildPlan, BuildError> {
  if let Some(unknown) = requested.iter().find(|name| !graph.contains(name)) {
    return Err(GraphError::NodeNotFound(unknown.clone()).into());
  }

  let load = loader.load_settings(project_path)?;
  let snapshot = loader.snapshot(project_path, arguments_state)?;
  let previous = store.load(project_path)?;

  let diff = diff_settings(previous.as_ref(), &snapshot);

  let mut signals: Vec<(String, LocalReason)> = requested
    .iter()
    .map(|name| (name.clone(), LocalReason::Requested))
    .collect();
  signals.extend(diff.local_signals());

  let marked = propagate(graph, signals)?;

  info!(
    project = %project_path.display(),
    changed = diff.changed.len(),
    added = diff.added.len(),
    marked,
    "planned rebuild"
  );

  Ok(RebuildPlan {
    load,
    diff,
    snapshot,
    marked,
  })
}
