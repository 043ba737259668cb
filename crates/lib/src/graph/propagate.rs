//! Rebuild propagation.
//!
//! A target is rebuilt when it is stale itself or when anything it depends on,
//! directly or transitively, is rebuilt. Nodes are visited in topological
//! order, so each node's dependencies are final before the node is decided and
//! a single pass reaches the fixed point.

use std::collections::HashMap;

use tracing::{debug, trace};

use super::dag::BuildGraph;
use super::types::{GraphError, LocalReason, RebuildCause};

/// Recompute every rebuild flag of `graph` from local staleness signals.
///
/// Signals naming targets that are not in the graph are ignored. Existing
/// flags are overwritten. Returns the number of nodes marked.
///
/// # Errors
///
/// Returns `CyclicGraph` if the graph has a cycle; no flag is touched then.
pub fn propagate<I>(graph: &mut BuildGraph, signals: I) -> Result<usize, GraphError>
where
  I: IntoIterator<Item = (String, LocalReason)>,
{
  let order = graph.topological_order()?;

  let mut local: HashMap<String, LocalReason> = HashMap::new();
  for (name, reason) in signals {
    if !graph.contains(&name) {
      debug!(target = %name, "ignoring signal for target outside the graph");
      continue;
    }
    local.entry(name).or_insert(reason);
  }

  let mut marked = 0;
  for idx in order {
    let name = graph.node_at(idx).name();

    let cause = match local.get(name) {
      Some(reason) => Some(RebuildCause::Local(*reason)),
      None => graph
        .dependency_indices(idx)
        .into_iter()
        .map(|dep| graph.node_at(dep))
        .find(|dep| dep.rebuild())
        .map(|dep| RebuildCause::Dependency(dep.name().to_string())),
    };

    if let Some(ref cause) = cause {
      trace!(target = %name, cause = %cause, "marked for rebuild");
      marked += 1;
    }

    graph.node_at_mut(idx).mark(cause);
  }

  debug!(marked, total = graph.len(), "propagated rebuild flags");
  Ok(marked)
}

/// Returns true if any node is marked for rebuild.
pub fn should_rebuild(graph: &BuildGraph) -> bool {
  graph.nodes().any(|node| node.rebuild())
}

/// Names of the marked nodes, dependencies first.
///
/// A cyclic graph can't have been propagated, so it yields its marked nodes
/// in insertion order.
pub fn rebuild_list(graph: &BuildGraph) -> Vec<&str> {
  match graph.topological_order() {
    Ok(order) => order
      .into_iter()
      .map(|idx| graph.node_at(idx))
      .filter(|node| node.rebuild())
      .map(|node| node.name())
      .collect(),
    Err(_) => graph.nodes().filter(|node| node.rebuild()).map(|node| node.name()).collect(),
  }
}
