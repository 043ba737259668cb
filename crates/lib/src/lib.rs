//! xcarchive-lib: incremental archive rebuilds for Xcode projects
//!
//! This crate decides which targets of an Xcode project have to be rebuilt
//! before an archive is produced:
//! - `settings`: build-settings containers, parsing, caching and diffing
//! - `graph`: the target dependency graph and rebuild propagation
//! - `build`: the go/no-go decision that invokes the real build
//! - `xcodebuild`: the `xcodebuild` wrapper used as settings source and build executor

pub mod build;
pub mod consts;
pub mod graph;
pub mod platform;
pub mod settings;
pub mod util;
pub mod xcodebuild;
