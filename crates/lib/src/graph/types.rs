//! Types for the build graph and rebuild propagation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or evaluating the build graph.
#[derive(Debug, Error)]
pub enum GraphError {
  /// The dependency relation contains a cycle through the named target.
  #[error("dependency cycle detected at target {0}")]
  CyclicGraph(String),

  /// Two nodes share a target name.
  #[error("duplicate target in graph: {0}")]
  DuplicateNode(String),

  /// A target depends on a name that is not in the graph.
  #[error("target {target} depends on unknown target {dependency}")]
  UnknownDependency { target: String, dependency: String },

  /// The named target is not in the graph.
  #[error("target not found in graph: {0}")]
  NodeNotFound(String),

  #[error("failed to read graph manifest {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse graph manifest: {0}")]
  Parse(#[from] serde_json::Error),
}

/// Why a target is stale on its own account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalReason {
  /// Its build settings differ from the stored ones.
  SettingsChanged,
  /// No stored settings exist for it.
  NoPreviousSettings,
  /// The build arguments differ from the ones the stored settings came from.
  ArgumentsChanged,
  /// The caller asked for it explicitly.
  Requested,
}

impl std::fmt::Display for LocalReason {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let text = match self {
      LocalReason::SettingsChanged => "settings changed",
      LocalReason::NoPreviousSettings => "no cached settings",
      LocalReason::ArgumentsChanged => "build arguments changed",
      LocalReason::Requested => "requested",
    };
    f.write_str(text)
  }
}

/// Why a node ended up marked for rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildCause {
  /// The node itself is stale.
  Local(LocalReason),
  /// The node depends on the named stale target.
  Dependency(String),
}

impl std::fmt::Display for RebuildCause {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      RebuildCause::Local(reason) => write!(f, "{}", reason),
      RebuildCause::Dependency(name) => write!(f, "depends on {}", name),
    }
  }
}
