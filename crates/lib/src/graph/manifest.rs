//! Graph manifest: the JSON description of a project's targets.
//!
//! ```json
//! {
//!   "project": "App/App.xcodeproj",
//!   "target": "App",
//!   "targets": [
//!     { "name": "Core" },
//!     { "name": "App", "dependencies": ["Core"] }
//!   ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::dag::BuildGraph;
use super::types::GraphError;

/// One target and the names of the targets it depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
  pub name: String,

  #[serde(default)]
  pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphManifest {
  /// Path of the `.xcodeproj` owning the targets.
  pub project: PathBuf,

  /// The target (and scheme) being archived. Also read from `scheme`.
  #[serde(alias = "scheme")]
  pub target: String,

  pub targets: Vec<TargetSpec>,
}

impl GraphManifest {
  /// Read a manifest from a JSON file.
  ///
  /// A relative `project` path is resolved against the manifest's directory.
  pub fn from_path(path: &Path) -> Result<Self, GraphError> {
    let content = fs::read_to_string(path).map_err(|source| GraphError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let mut manifest = Self::from_json(&content)?;

    if manifest.project.is_relative()
      && let Some(parent) = path.parent()
    {
      manifest.project = parent.join(&manifest.project);
    }

    Ok(manifest)
  }

  pub fn from_json(content: &str) -> Result<Self, GraphError> {
    Ok(serde_json::from_str(content)?)
  }

  /// Build the dependency graph, checking names and acyclicity.
  pub fn to_graph(&self) -> Result<BuildGraph, GraphError> {
    let mut graph = BuildGraph::new();

    for spec in &self.targets {
      graph.add_node(spec.name.clone())?;
    }

    for spec in &self.targets {
      for dependency in &spec.dependencies {
        graph.add_dependency(&spec.name, dependency)?;
      }
    }

    if !graph.contains(&self.target) {
      return Err(GraphError::NodeNotFound(self.target.clone()));
    }

    graph.topological_order()?;
    Ok(graph)
  }
}
