//! Synchronous `xcodebuild` executor.
//!
//! Owns a current-thread runtime and blocks on each process, so callers
//! see plain [`SettingsSource`] and [`BuildExecutor`] implementations.

use std::path::Path;

use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use crate::build::{BuildError, BuildExecutor};
use crate::settings::{SettingsError, SettingsSource};

use super::shell::{run_captured, run_inherited};
use super::types::{ExecutorConfig, ExecutorError};

pub struct Executor {
  config: ExecutorConfig,
  runtime: Runtime,
}

impl Executor {
  pub fn new(config: ExecutorConfig) -> Result<Self, ExecutorError> {
    let runtime = Builder::new_current_thread()
      .enable_all()
      .build()
      .map_err(ExecutorError::Runtime)?;
    Ok(Self { config, runtime })
  }

  pub fn config(&self) -> &ExecutorConfig {
    &self.config
  }

  pub fn arguments_state(&self) -> String {
    self.config.arguments_state()
  }

  pub fn is_simulator(&self) -> Result<bool, ExecutorError> {
    self.config.is_simulator()
  }

  /// Raw `-showBuildSettings` output for every target of `project_path`.
  pub fn show_build_settings(&self, project_path: &Path) -> Result<String, ExecutorError> {
    let args = self.config.settings_args(project_path)?;
    debug!(project = %project_path.display(), "loading build settings");
    self.runtime.block_on(run_captured(&self.config.program, &args))
  }

  /// Build `scheme`, returning whether the build succeeded.
  pub fn run_build(&self, project_path: &Path, scheme: &str, derived_data_path: &Path) -> Result<bool, ExecutorError> {
    let args = self.config.build_args(project_path, scheme, derived_data_path)?;
    self.runtime.block_on(run_inherited(&self.config.program, &args))
  }
}

impl SettingsSource for Executor {
  fn load_build_settings(&self, project_path: &Path) -> Result<String, SettingsError> {
    self
      .show_build_settings(project_path)
      .map_err(|e| SettingsError::Source {
        project: project_path.to_path_buf(),
        message: e.to_string(),
      })
  }
}

impl BuildExecutor for Executor {
  fn build(&self, project_path: &Path, scheme: &str, derived_data_path: &Path) -> Result<bool, BuildError> {
    Ok(self.run_build(project_path, scheme, derived_data_path)?)
  }
}
