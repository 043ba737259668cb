//! Types for the rebuild decision and build execution.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::graph::GraphError;
use crate::settings::SettingsError;
use crate::xcodebuild::ExecutorError;

/// Errors that can occur while planning or performing a rebuild.
#[derive(Debug, Error)]
pub enum BuildError {
  /// The build executor ran but reported an unsuccessful build.
  #[error("failed to perform rebuild of scheme {scheme} in {project}")]
  BuildFailure { project: PathBuf, scheme: String },

  /// The build executor could not run the build at all.
  #[error("build executor error: {0}")]
  Executor(#[from] ExecutorError),

  #[error(transparent)]
  Graph(#[from] GraphError),

  #[error(transparent)]
  Settings(#[from] SettingsError),
}

/// The target being archived and the project that owns it.
///
/// The target name doubles as the scheme passed to the build tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
  pub project_path: PathBuf,
  pub name: String,
}

impl BuildTarget {
  pub fn new(project_path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
    Self {
      project_path: project_path.into(),
      name: name.into(),
    }
  }

  pub fn project_path(&self) -> &Path {
    &self.project_path
  }

  pub fn scheme(&self) -> &str {
    &self.name
  }
}

/// Result of a `rebuild_missing` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BuildOutcome {
  /// Nothing was stale; the build tool was not invoked.
  UpToDate,
  /// The build tool ran once for the listed stale targets.
  Rebuilt { targets: Vec<String> },
}

impl BuildOutcome {
  pub fn is_rebuilt(&self) -> bool {
    matches!(self, BuildOutcome::Rebuilt { .. })
  }
}
