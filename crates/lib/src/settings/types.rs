//! Types shared by the settings loader, store and diff.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::container::SettingsContainer;

/// Current settings snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors raised while loading, parsing, looking up or persisting build settings.
#[derive(Debug, Error)]
pub enum SettingsError {
  /// Raw settings text did not match the header / `KEY = VALUE` shape.
  #[error("malformed build settings at line {line}: {message}")]
  Parse { line: usize, message: String },

  /// `load_settings` was never called for the project.
  #[error("no build settings loaded for project {0}")]
  ProjectNotLoaded(PathBuf),

  /// The project was loaded but did not report the target.
  #[error("no build settings for target {target} in project {project}")]
  NotFound { project: PathBuf, target: String },

  /// The settings source failed to produce settings text.
  #[error("failed to retrieve build settings for {project}: {message}")]
  Source { project: PathBuf, message: String },

  #[error("failed to create settings directory: {0}")]
  CreateDir(#[source] std::io::Error),

  #[error("failed to read settings snapshot: {0}")]
  Read(#[source] std::io::Error),

  #[error("failed to write settings snapshot: {0}")]
  Write(#[source] std::io::Error),

  #[error("failed to serialize settings snapshot: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("failed to parse settings snapshot: {0}")]
  Deserialize(#[source] serde_json::Error),

  #[error("unsupported settings snapshot version: {0}")]
  UnsupportedVersion(u32),
}

/// All settings containers of one project, as persisted between invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsSnapshot {
  /// Format version, see [`SNAPSHOT_VERSION`].
  pub version: u32,

  /// The project the settings were loaded from.
  pub project_path: PathBuf,

  /// Fingerprint of the build arguments (configuration, platform, destination,
  /// action, extra args) the settings were retrieved with.
  pub arguments_state: String,

  /// Target name -> settings.
  pub targets: BTreeMap<String, SettingsContainer>,
}

impl SettingsSnapshot {
  pub fn new(project_path: impl Into<PathBuf>, arguments_state: impl Into<String>) -> Self {
    Self {
      version: SNAPSHOT_VERSION,
      project_path: project_path.into(),
      arguments_state: arguments_state.into(),
      targets: BTreeMap::new(),
    }
  }

  pub fn get(&self, target: &str) -> Option<&SettingsContainer> {
    self.targets.get(target)
  }
}

/// What a call to `load_settings` did to the cache.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
  /// Targets seen for the first time.
  pub added: Vec<String>,

  /// Targets whose container was replaced by a different one.
  pub changed: Vec<String>,

  /// Targets whose cached container was kept as is.
  pub unchanged: Vec<String>,

  /// Targets no longer reported by the project.
  pub removed: Vec<String>,
}

impl LoadReport {
  /// Returns true if the cache now differs from before the load.
  pub fn has_changes(&self) -> bool {
    !self.added.is_empty() || !self.changed.is_empty() || !self.removed.is_empty()
  }

  /// Total number of targets present after the load.
  pub fn target_count(&self) -> usize {
    self.added.len() + self.changed.len() + self.unchanged.len()
  }
}
