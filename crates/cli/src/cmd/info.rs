use std::path::Path;

use anyhow::Result;

use xcarchive_lib::platform::paths::{cache_dir, config_dir};

use super::settings_store;
use crate::output::{print_json, print_stat};

pub fn cmd_info(cache_dir_override: Option<&Path>, json: bool) -> Result<()> {
  let cache = cache_dir_override.map(Path::to_path_buf).unwrap_or_else(cache_dir);
  let store = settings_store(cache_dir_override);

  if json {
    let json_output = serde_json::json!({
      "version": env!("CARGO_PKG_VERSION"),
      "cache_dir": cache,
      "settings_dir": store.base_path(),
      "config_dir": config_dir(),
    });
    return print_json(&json_output);
  }

  println!("xcarchive {}", env!("CARGO_PKG_VERSION"));
  print_stat("Cache", &cache.display().to_string());
  print_stat("Settings", &store.base_path().display().to_string());
  print_stat("Config", &config_dir().display().to_string());
  Ok(())
}
