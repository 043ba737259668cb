//! `xcodebuild` argument composition.

use std::path::Path;

use crate::consts::{ARCHIVE_ACTION, GENERIC_DESTINATION};

use super::types::{ExecutorConfig, ExecutorError};

impl ExecutorConfig {
  /// Fingerprint of everything that affects the reported build settings.
  pub fn arguments_state(&self) -> String {
    format!(
      "{}-{}-{}-{}-{}",
      self.configuration,
      self.platform,
      self.destination,
      self.action,
      self.args.join(" ")
    )
  }

  /// Value for `-destination`.
  ///
  /// Archives can only be made for the generic destination. Other actions use
  /// the first configured destination mentioning the platform.
  pub fn destination_specifier(&self) -> Result<String, ExecutorError> {
    let inferred = if self.action == ARCHIVE_ACTION {
      Some(GENERIC_DESTINATION)
    } else {
      let platform = self.platform.to_lowercase();
      self
        .destination
        .split('|')
        .find(|destination| destination.to_lowercase().contains(&platform))
    };

    match inferred {
      Some(GENERIC_DESTINATION) => Ok(format!("generic/platform={}", self.platform)),
      Some(destination) => Ok(destination.to_string()),
      None => Err(ExecutorError::DestinationNotSet(self.platform.clone())),
    }
  }

  /// Whether the resolved destination is a simulator.
  pub fn is_simulator(&self) -> Result<bool, ExecutorError> {
    Ok(self.destination_specifier()?.contains("Simulator"))
  }

  /// Arguments for `-showBuildSettings` over all targets of a project.
  pub fn settings_args(&self, project_path: &Path) -> Result<Vec<String>, ExecutorError> {
    let mut args = self.common_args(project_path)?;
    args.push("-alltargets".to_string());
    args.push("-showBuildSettings".to_string());
    args.extend(self.args.iter().cloned());
    args.push(self.action.clone());
    Ok(args)
  }

  /// Arguments for building `scheme` into `derived_data_path`.
  pub fn build_args(
    &self,
    project_path: &Path,
    scheme: &str,
    derived_data_path: &Path,
  ) -> Result<Vec<String>, ExecutorError> {
    let mut args = self.common_args(project_path)?;
    args.push("-scheme".to_string());
    args.push(scheme.to_string());
    args.push("-derivedDataPath".to_string());
    args.push(derived_data_path.to_string_lossy().into_owned());
    args.extend(self.args.iter().cloned());
    args.push(self.action.clone());
    Ok(args)
  }

  fn common_args(&self, project_path: &Path) -> Result<Vec<String>, ExecutorError> {
    Ok(vec![
      "-project".to_string(),
      project_path.to_string_lossy().into_owned(),
      "-configuration".to_string(),
      self.configuration.clone(),
      "-destination".to_string(),
      self.destination_specifier()?,
    ])
  }
}
