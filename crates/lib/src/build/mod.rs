//! Rebuild planning and execution.
//!
//! # Submodules
//!
//! - [`incremental`] - settings load, diff and propagation for one project
//! - [`performer`] - the go/no-go decision that invokes the build tool

pub mod incremental;
pub mod performer;
mod types;

pub use incremental::{RebuildPlan, plan_rebuild};
pub use performer::{BuildExecutor, Performer};
pub use types::*;
