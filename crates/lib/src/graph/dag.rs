//! Target dependency graph.
//!
//! One node per target, stored in a petgraph arena. Edges run from a
//! dependency to its dependent, so a node's dependencies are its incoming
//! neighbours.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use super::types::{GraphError, RebuildCause};

/// A target in the build graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
  name: String,
  rebuild: bool,
  cause: Option<RebuildCause>,
}

impl Node {
  fn new(name: String) -> Self {
    Self {
      name,
      rebuild: false,
      cause: None,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Whether the target is marked for rebuild.
  pub fn rebuild(&self) -> bool {
    self.rebuild
  }

  /// Why the target is marked, if it is.
  pub fn cause(&self) -> Option<&RebuildCause> {
    self.cause.as_ref()
  }

  pub(crate) fn mark(&mut self, cause: Option<RebuildCause>) {
    self.rebuild = cause.is_some();
    self.cause = cause;
  }
}

/// Directed acyclic graph of targets.
///
/// Acyclicity is checked when the graph is ordered: a cycle surfaces as
/// [`GraphError::CyclicGraph`] from [`BuildGraph::topological_order`].
#[derive(Debug, Clone, Default)]
pub struct BuildGraph {
  graph: DiGraph<Node, ()>,
  nodes: HashMap<String, NodeIndex>,
}

impl BuildGraph {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a target. Names must be unique.
  pub fn add_node(&mut self, name: impl Into<String>) -> Result<NodeIndex, GraphError> {
    let name = name.into();
    if self.nodes.contains_key(&name) {
      return Err(GraphError::DuplicateNode(name));
    }

    let idx = self.graph.add_node(Node::new(name.clone()));
    self.nodes.insert(name, idx);
    Ok(idx)
  }

  /// Record that `dependent` depends on `dependency`. Adding the same edge twice is a no-op.
  pub fn add_dependency(&mut self, dependent: &str, dependency: &str) -> Result<(), GraphError> {
    let dependent_idx = self.index_of(dependent)?;
    let dependency_idx = *self.nodes.get(dependency).ok_or_else(|| GraphError::UnknownDependency {
      target: dependent.to_string(),
      dependency: dependency.to_string(),
    })?;

    self.graph.update_edge(dependency_idx, dependent_idx, ());
    Ok(())
  }

  pub fn contains(&self, name: &str) -> bool {
    self.nodes.contains_key(name)
  }

  pub fn node(&self, name: &str) -> Option<&Node> {
    self.nodes.get(name).map(|&idx| &self.graph[idx])
  }

  /// All nodes in insertion order.
  pub fn nodes(&self) -> impl Iterator<Item = &Node> {
    self.graph.node_indices().map(|idx| &self.graph[idx])
  }

  pub fn len(&self) -> usize {
    self.graph.node_count()
  }

  pub fn is_empty(&self) -> bool {
    self.graph.node_count() == 0
  }

  /// Direct dependencies of a target, sorted by name.
  pub fn dependencies(&self, name: &str) -> Result<Vec<&str>, GraphError> {
    let idx = self.index_of(name)?;
    Ok(self.neighbour_names(idx, Direction::Incoming))
  }

  /// Targets that directly depend on `name`, sorted by name.
  pub fn dependents(&self, name: &str) -> Result<Vec<&str>, GraphError> {
    let idx = self.index_of(name)?;
    Ok(self.neighbour_names(idx, Direction::Outgoing))
  }

  /// Target names ordered so every dependency precedes its dependents.
  pub fn topological_names(&self) -> Result<Vec<&str>, GraphError> {
    Ok(
      self
        .topological_order()?
        .into_iter()
        .map(|idx| self.graph[idx].name())
        .collect(),
    )
  }

  /// Node indices ordered so every dependency precedes its dependents.
  ///
  /// Among targets whose dependencies are all placed, the one added first
  /// goes first, so the order is stable for a given graph.
  ///
  /// # Errors
  ///
  /// Returns `CyclicGraph` naming a target on or behind a cycle.
  pub fn topological_order(&self) -> Result<Vec<NodeIndex>, GraphError> {
    let mut in_degree: Vec<usize> = self
      .graph
      .node_indices()
      .map(|idx| self.graph.neighbors_directed(idx, Direction::Incoming).count())
      .collect();

    let mut ready: BinaryHeap<Reverse<NodeIndex>> = self
      .graph
      .node_indices()
      .filter(|idx| in_degree[idx.index()] == 0)
      .map(Reverse)
      .collect();

    let mut order = Vec::with_capacity(self.graph.node_count());
    while let Some(Reverse(idx)) = ready.pop() {
      order.push(idx);
      for dependent in self.graph.neighbors_directed(idx, Direction::Outgoing) {
        let degree = &mut in_degree[dependent.index()];
        *degree = degree.saturating_sub(1);
        if *degree == 0 {
          ready.push(Reverse(dependent));
        }
      }
    }

    if let Some(stuck) = self.graph.node_indices().find(|idx| in_degree[idx.index()] > 0) {
      return Err(GraphError::CyclicGraph(self.graph[stuck].name.clone()));
    }

    Ok(order)
  }

  /// Clear every rebuild flag.
  pub fn reset(&mut self) {
    for node in self.graph.node_weights_mut() {
      node.mark(None);
    }
  }

  pub(crate) fn node_at(&self, idx: NodeIndex) -> &Node {
    &self.graph[idx]
  }

  pub(crate) fn node_at_mut(&mut self, idx: NodeIndex) -> &mut Node {
    &mut self.graph[idx]
  }

  pub(crate) fn index(&self, name: &str) -> Option<NodeIndex> {
    self.nodes.get(name).copied()
  }

  /// Dependency indices of `idx`, sorted by dependency name.
  pub(crate) fn dependency_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
    let mut deps: Vec<NodeIndex> = self.graph.neighbors_directed(idx, Direction::Incoming).collect();
    deps.sort_by(|a, b| self.graph[*a].name.cmp(&self.graph[*b].name));
    deps
  }

  fn index_of(&self, name: &str) -> Result<NodeIndex, GraphError> {
    self
      .index(name)
      .ok_or_else(|| GraphError::NodeNotFound(name.to_string()))
  }

  fn neighbour_names(&self, idx: NodeIndex, direction: Direction) -> Vec<&str> {
    let mut names: Vec<&str> = self
      .graph
      .neighbors_directed(idx, direction)
      .map(|n| self.graph[n].name())
      .collect();
    names.sort_unstable();
    names
  }
}
