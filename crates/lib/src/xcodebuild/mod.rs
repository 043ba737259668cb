//! `xcodebuild` integration.
//!
//! [`Executor`] is the production [`SettingsSource`](crate::settings::SettingsSource)
//! and [`BuildExecutor`](crate::build::BuildExecutor).

mod command;
mod executor;
mod shell;
mod types;

pub use executor::Executor;
pub use types::{ExecutorConfig, ExecutorError};
