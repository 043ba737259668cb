//! Rebuild decision.
//!
//! The performer asks the graph whether anything is stale and, if so, runs the
//! build tool once for the whole project and scheme. The build tool cannot
//! build individual graph nodes, so the rebuild set only decides whether to
//! build at all.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::graph::{BuildGraph, RebuildCause, rebuild_list, should_rebuild};

use super::types::{BuildError, BuildOutcome, BuildTarget};

/// Runs a full build of a project's scheme.
pub trait BuildExecutor {
  /// Build `scheme` of `project_path` into `derived_data_path`.
  ///
  /// Returns `Ok(false)` when the build ran and failed, and an error when it
  /// could not be run.
  fn build(&self, project_path: &Path, scheme: &str, derived_data_path: &Path) -> Result<bool, BuildError>;
}

impl<E: BuildExecutor + ?Sized> BuildExecutor for &E {
  fn build(&self, project_path: &Path, scheme: &str, derived_data_path: &Path) -> Result<bool, BuildError> {
    (**self).build(project_path, scheme, derived_data_path)
  }
}

pub struct Performer<E> {
  executor: E,
  derived_data_path: PathBuf,
}

impl<E: BuildExecutor> Performer<E> {
  pub fn new(executor: E, derived_data_path: impl Into<PathBuf>) -> Self {
    Self {
      executor,
      derived_data_path: derived_data_path.into(),
    }
  }

  pub fn derived_data_path(&self) -> &Path {
    &self.derived_data_path
  }

  /// Build `target`'s project if any node of `graph` is marked for rebuild.
  ///
  /// # Errors
  ///
  /// `BuildFailure` if the build ran and failed; executor errors are passed through.
  pub fn rebuild_missing(&self, target: &BuildTarget, graph: &BuildGraph) -> Result<BuildOutcome, BuildError> {
    if !should_rebuild(graph) {
      info!("no need to rebuild anything");
      return Ok(BuildOutcome::UpToDate);
    }

    let targets: Vec<String> = rebuild_list(graph).into_iter().map(String::from).collect();
    info!(targets = %targets.join(", "), "going to rebuild");

    for node in graph.nodes() {
      if let Some(RebuildCause::Dependency(dependency)) = node.cause() {
        debug!(target = %node.name(), dependency = %dependency, "rebuilt because of a dependency");
      }
    }

    let succeeded = self
      .executor
      .build(target.project_path(), target.scheme(), &self.derived_data_path)?;

    if !succeeded {
      return Err(BuildError::BuildFailure {
        project: target.project_path.clone(),
        scheme: target.name.clone(),
      });
    }

    info!(scheme = %target.scheme(), count = targets.len(), "rebuild finished");
    Ok(BuildOutcome::Rebuilt { targets })
  }
}
