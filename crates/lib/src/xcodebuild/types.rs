//! Types for the `xcodebuild` executor.

use thiserror::Error;

use crate::consts::{ARCHIVE_ACTION, GENERIC_DESTINATION};

/// Errors that can occur while running `xcodebuild`.
#[derive(Debug, Error)]
pub enum ExecutorError {
  /// No destination matches the platform and the action needs a concrete one.
  #[error("destination not set for {0} platform")]
  DestinationNotSet(String),

  /// Command exited unsuccessfully.
  #[error("command failed with exit code {code:?}: {cmd}")]
  CommandFailed { cmd: String, code: Option<i32> },

  /// I/O error while spawning or waiting for the command.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// The async runtime driving the process could not be created.
  #[error("failed to create async runtime: {0}")]
  Runtime(#[source] std::io::Error),
}

/// Arguments shared by every `xcodebuild` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
  /// Build configuration, e.g. `Release`.
  pub configuration: String,

  /// Platform (SDK) name, e.g. `iphoneos`.
  pub platform: String,

  /// One or more destinations separated by `|`.
  pub destination: String,

  /// Build action, e.g. `archive`.
  pub action: String,

  /// Extra arguments passed through to `xcodebuild`.
  pub args: Vec<String>,

  /// The program to run.
  pub program: String,
}

impl Default for ExecutorConfig {
  fn default() -> Self {
    Self {
      configuration: "Release".to_string(),
      platform: "iphoneos".to_string(),
      destination: GENERIC_DESTINATION.to_string(),
      action: ARCHIVE_ACTION.to_string(),
      args: Vec::new(),
      program: "xcodebuild".to_string(),
    }
  }
}
