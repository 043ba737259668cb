mod build;
mod info;
mod plan;
mod settings;

use std::path::{Path, PathBuf};

use clap::Args;

use xcarchive_lib::settings::{IdentityKeys, LoaderConfig, SettingsStore};
use xcarchive_lib::xcodebuild::ExecutorConfig;

pub use build::cmd_build;
pub use info::cmd_info;
pub use plan::cmd_plan;
pub use settings::cmd_settings;

/// Options forwarded to every xcodebuild invocation.
#[derive(Args, Debug, Clone)]
pub struct XcodebuildOpts {
  /// Build configuration
  #[arg(short, long, default_value = "Release")]
  pub configuration: String,

  /// Platform (SDK) name
  #[arg(short, long, default_value = "iphoneos")]
  pub platform: String,

  /// Destinations separated by '|'
  #[arg(short, long, default_value = "generic")]
  pub destination: String,

  /// xcodebuild action
  #[arg(short, long, default_value = "archive")]
  pub action: String,

  /// xcodebuild executable
  #[arg(long, value_name = "PATH", default_value = "xcodebuild")]
  pub xcodebuild: String,

  /// Extra arguments passed through to xcodebuild
  #[arg(last = true, value_name = "ARGS")]
  pub args: Vec<String>,
}

impl XcodebuildOpts {
  pub fn executor_config(&self) -> ExecutorConfig {
    ExecutorConfig {
      configuration: self.configuration.clone(),
      platform: self.platform.clone(),
      destination: self.destination.clone(),
      action: self.action.clone(),
      args: self.args.clone(),
      program: self.xcodebuild.clone(),
    }
  }
}

/// Options shared by `plan` and `build`.
#[derive(Args, Debug, Clone)]
pub struct RebuildOpts {
  /// Path to the graph manifest (JSON)
  #[arg(default_value = "xcarchive.json")]
  pub manifest: PathBuf,

  /// Rebuild this target regardless of its settings (repeatable)
  #[arg(short, long = "force", value_name = "TARGET")]
  pub force: Vec<String>,

  /// Identity key (repeatable; replaces the default set)
  #[arg(long = "identity-key", value_name = "KEY")]
  pub identity_keys: Vec<String>,

  #[command(flatten)]
  pub xcodebuild: XcodebuildOpts,
}

pub(crate) fn loader_config(identity_keys: &[String]) -> LoaderConfig {
  if identity_keys.is_empty() {
    return LoaderConfig::default();
  }
  LoaderConfig {
    identity_keys: IdentityKeys::new(identity_keys.iter().cloned()),
  }
}

pub(crate) fn settings_store(cache_dir: Option<&Path>) -> SettingsStore {
  match cache_dir {
    Some(dir) => SettingsStore::new(dir.join("settings")),
    None => SettingsStore::default_store(),
  }
}
