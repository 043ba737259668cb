//! Implementation of the `xcarchive settings` command.

use std::path::Path;

use anyhow::{Context, Result};

use xcarchive_lib::settings::SettingsLoader;
use xcarchive_lib::xcodebuild::Executor;

use super::{XcodebuildOpts, loader_config};
use crate::output::{print_info, print_json, print_stat, symbols};

pub fn cmd_settings(
  project: &Path,
  target: Option<&str>,
  identity_only: bool,
  identity_keys: &[String],
  opts: &XcodebuildOpts,
  json: bool,
) -> Result<()> {
  let executor = Executor::new(opts.executor_config()).context("Failed to set up xcodebuild")?;
  let mut loader = SettingsLoader::with_config(&executor, loader_config(identity_keys));
  loader
    .load_settings(project)
    .with_context(|| format!("Failed to load build settings for {}", project.display()))?;

  let Some(target) = target else {
    let targets = loader.targets(project);
    if json {
      return print_json(&targets);
    }
    print_info(&format!("{} target(s) in {}", targets.len(), project.display()));
    for name in targets {
      println!("  {} {}", symbols::INFO, name);
    }
    return Ok(());
  };

  let container = loader.get_settings(project, target)?;
  let settings = if identity_only {
    container.identity_settings()
  } else {
    container.full_settings()
  };

  if json {
    return print_json(settings);
  }

  print_info(&format!("{} ({} settings)", target, settings.len()));
  for (key, value) in settings {
    print_stat(key, value);
  }

  Ok(())
}
