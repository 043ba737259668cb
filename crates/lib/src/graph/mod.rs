//! Build graph of a project's targets and rebuild propagation.

pub mod dag;
pub mod manifest;
pub mod propagate;
pub mod types;

pub use dag::{BuildGraph, Node};
pub use manifest::{GraphManifest, TargetSpec};
pub use propagate::{propagate, rebuild_list, should_rebuild};
pub use types::{GraphError, LocalReason, RebuildCause};
