//! Settings snapshot storage.
//!
//! Keeps the settings of the last successful build per project so the next
//! invocation can tell which targets changed.
//!
//! # Storage Layout
//!
//! ```text
//! {cache_dir}/settings/
//! └── <hash of project path>.json   # SettingsSnapshot
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::platform::paths::settings_dir;
use crate::util::hash::ObjectHash;

use super::types::{SNAPSHOT_VERSION, SettingsError, SettingsSnapshot};

/// Manages settings snapshots on disk.
///
/// Writes are atomic (temp file, then rename).
#[derive(Debug, Clone)]
pub struct SettingsStore {
  base_path: PathBuf,
}

impl SettingsStore {
  pub fn new(base_path: PathBuf) -> Self {
    Self { base_path }
  }

  /// Store at the default location (`~/.cache/xcarchive/settings`).
  pub fn default_store() -> Self {
    Self::new(settings_dir())
  }

  pub fn base_path(&self) -> &Path {
    &self.base_path
  }

  /// Path of the snapshot file for a project.
  pub fn snapshot_path(&self, project_path: &Path) -> PathBuf {
    let hash = ObjectHash::of_str(&project_path.to_string_lossy());
    self.base_path.join(format!("{}.json", hash))
  }

  fn ensure_dir(&self) -> Result<(), SettingsError> {
    fs::create_dir_all(&self.base_path).map_err(SettingsError::CreateDir)
  }

  /// Load the stored snapshot of a project.
  ///
  /// Returns `Ok(None)` if nothing was stored yet.
  pub fn load(&self, project_path: &Path) -> Result<Option<SettingsSnapshot>, SettingsError> {
    let path = self.snapshot_path(project_path);

    let content = match fs::read_to_string(&path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(SettingsError::Read(e)),
    };

    let snapshot: SettingsSnapshot = serde_json::from_str(&content).map_err(SettingsError::Deserialize)?;

    if snapshot.version != SNAPSHOT_VERSION {
      return Err(SettingsError::UnsupportedVersion(snapshot.version));
    }

    debug!(project = %project_path.display(), path = %path.display(), "loaded settings snapshot");
    Ok(Some(snapshot))
  }

  /// Save a snapshot, replacing the stored one for the same project.
  pub fn save(&self, snapshot: &SettingsSnapshot) -> Result<PathBuf, SettingsError> {
    self.ensure_dir()?;

    let path = self.snapshot_path(&snapshot.project_path);
    let temp_path = path.with_extension("json.tmp");

    let content = serde_json::to_string_pretty(snapshot).map_err(SettingsError::Serialize)?;
    fs::write(&temp_path, &content).map_err(SettingsError::Write)?;
    fs::rename(&temp_path, &path).map_err(SettingsError::Write)?;

    debug!(project = %snapshot.project_path.display(), path = %path.display(), "saved settings snapshot");
    Ok(path)
  }

  /// Remove the stored snapshot of a project. Returns whether one existed.
  pub fn remove(&self, project_path: &Path) -> Result<bool, SettingsError> {
    match fs::remove_file(self.snapshot_path(project_path)) {
      Ok(()) => Ok(true),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
      Err(e) => Err(SettingsError::Write(e)),
    }
  }
}
