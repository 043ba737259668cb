//! Build settings loader and cache.
//!
//! The loader asks a [`SettingsSource`] for the raw settings of a project,
//! parses them into one [`SettingsContainer`] per target and caches the
//! containers under a `(project path, target name)` key.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use super::container::{IdentityKeys, SettingsContainer};
use super::parser::parse_build_settings;
use super::types::{LoadReport, SettingsError, SettingsSnapshot};

/// Produces raw `-showBuildSettings` text for a project.
pub trait SettingsSource {
  fn load_build_settings(&self, project_path: &Path) -> Result<String, SettingsError>;
}

impl<S: SettingsSource + ?Sized> SettingsSource for &S {
  fn load_build_settings(&self, project_path: &Path) -> Result<String, SettingsError> {
    (**self).load_build_settings(project_path)
  }
}

/// Loader configuration.
#[derive(Debug, Clone, Default)]
pub struct LoaderConfig {
  /// Keys copied into each container's identity settings.
  pub identity_keys: IdentityKeys,
}

/// Cache key: one entry per target of a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SettingsKey {
  pub project: PathBuf,
  pub target: String,
}

impl SettingsKey {
  pub fn new(project: impl Into<PathBuf>, target: impl Into<String>) -> Self {
    Self {
      project: project.into(),
      target: target.into(),
    }
  }
}

pub struct SettingsLoader<S> {
  source: S,
  config: LoaderConfig,
  cache: HashMap<SettingsKey, Arc<SettingsContainer>>,
  loaded_projects: HashSet<PathBuf>,
}

impl<S: SettingsSource> SettingsLoader<S> {
  pub fn new(source: S) -> Self {
    Self::with_config(source, LoaderConfig::default())
  }

  pub fn with_config(source: S, config: LoaderConfig) -> Self {
    Self {
      source,
      config,
      cache: HashMap::new(),
      loaded_projects: HashSet::new(),
    }
  }

  pub fn source(&self) -> &S {
    &self.source
  }

  pub fn config(&self) -> &LoaderConfig {
    &self.config
  }

  /// Retrieve, parse and cache the settings of every target in `project_path`.
  ///
  /// Containers equal to the cached ones are kept as the same `Arc`; different
  /// ones replace the cached entry. Targets no longer reported are dropped.
  /// On a parse error the cache is left untouched.
  pub fn load_settings(&mut self, project_path: &Path) -> Result<LoadReport, SettingsError> {
    debug!(project = %project_path.display(), "loading build settings");
    let text = self.source.load_build_settings(project_path)?;
    self.load_from_text(project_path, &text)
  }

  /// Parse `text` as the settings of `project_path` and update the cache.
  pub fn load_from_text(&mut self, project_path: &Path, text: &str) -> Result<LoadReport, SettingsError> {
    let blocks = parse_build_settings(text)?;

    let mut parsed: HashMap<String, SettingsContainer> = HashMap::new();
    for block in blocks {
      let container = SettingsContainer::from_full(block.settings, &self.config.identity_keys);
      if parsed.insert(block.target.clone(), container).is_some() {
        debug!(target = %block.target, "target reported twice, keeping the last block");
      }
    }

    let previous: BTreeSet<String> = self.targets(project_path).into_iter().collect();
    let mut report = LoadReport::default();

    let mut names: Vec<String> = parsed.keys().cloned().collect();
    names.sort();

    for name in names {
      let Some(container) = parsed.remove(&name) else {
        continue;
      };
      let key = SettingsKey::new(project_path, name.clone());

      match self.cache.get(&key) {
        Some(cached) if **cached == container => report.unchanged.push(name),
        Some(_) => {
          self.cache.insert(key, Arc::new(container));
          report.changed.push(name);
        }
        None => {
          self.cache.insert(key, Arc::new(container));
          report.added.push(name);
        }
      }
    }

    for name in previous {
      if !report.unchanged.contains(&name) && !report.changed.contains(&name) {
        self.cache.remove(&SettingsKey::new(project_path, name.clone()));
        report.removed.push(name);
      }
    }

    self.loaded_projects.insert(project_path.to_path_buf());

    info!(
      project = %project_path.display(),
      targets = report.target_count(),
      added = report.added.len(),
      changed = report.changed.len(),
      removed = report.removed.len(),
      "loaded build settings"
    );

    Ok(report)
  }

  /// Cached settings of `target_name` in `project_path`.
  pub fn get_settings(&self, project_path: &Path, target_name: &str) -> Result<Arc<SettingsContainer>, SettingsError> {
    if !self.loaded_projects.contains(project_path) {
      return Err(SettingsError::ProjectNotLoaded(project_path.to_path_buf()));
    }

    self
      .cache
      .get(&SettingsKey::new(project_path, target_name))
      .cloned()
      .ok_or_else(|| SettingsError::NotFound {
        project: project_path.to_path_buf(),
        target: target_name.to_string(),
      })
  }

  /// Names of the cached targets of `project_path`, sorted.
  pub fn targets(&self, project_path: &Path) -> Vec<String> {
    let mut names: Vec<String> = self
      .cache
      .keys()
      .filter(|key| key.project == project_path)
      .map(|key| key.target.clone())
      .collect();
    names.sort();
    names
  }

  pub fn is_loaded(&self, project_path: &Path) -> bool {
    self.loaded_projects.contains(project_path)
  }

  /// Collect the cached containers of `project_path` into a snapshot.
  pub fn snapshot(&self, project_path: &Path, arguments_state: &str) -> Result<SettingsSnapshot, SettingsError> {
    if !self.is_loaded(project_path) {
      return Err(SettingsError::ProjectNotLoaded(project_path.to_path_buf()));
    }

    let mut snapshot = SettingsSnapshot::new(project_path, arguments_state);
    for (key, container) in &self.cache {
      if key.project == project_path {
        snapshot.targets.insert(key.target.clone(), (**container).clone());
      }
    }
    Ok(snapshot)
  }

  /// Seed the cache of a project from a persisted snapshot.
  pub fn insert_snapshot(&mut self, snapshot: &SettingsSnapshot) {
    for (target, container) in &snapshot.targets {
      self.cache.insert(
        SettingsKey::new(&snapshot.project_path, target.clone()),
        Arc::new(container.clone()),
      );
    }
    self.loaded_projects.insert(snapshot.project_path.clone());
  }
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;
  use std::collections::HashMap;

  use super::*;
  use crate::settings::container::SettingsMap;

  /// In-memory settings source returning canned text per project.
  #[derive(Default)]
  struct FakeSource {
    outputs: RefCell<HashMap<PathBuf, String>>,
  }

  impl FakeSource {
    fn set(&self, project: &str, text: &str) {
      self.outputs.borrow_mut().insert(PathBuf::from(project), text.to_string());
    }
  }

  impl SettingsSource for FakeSource {
    fn load_build_settings(&self, project_path: &Path) -> Result<String, SettingsError> {
      self
        .outputs
        .borrow()
        .get(project_path)
        .cloned()
        .ok_or_else(|| SettingsError::Source {
          project: project_path.to_path_buf(),
          message: "no such project".to_string(),
        })
    }
  }

  const FIRST_PROJECT: &str = "Build settings for action archive target first\n  \
    TARGETNAME = first\n  \
    ARCH = armv7\n  \
    PATH = some path\n\
    Build settings for action archive target second\n  \
    TARGETNAME = second\n  \
    ARCH = arm64\n  \
    PATH = some path\n";

  const SECOND_PROJECT: &str = "Build settings for action archive target first\n  \
    TARGETNAME = first\n  \
    ARCH = armv7s\n  \
    PATH = some path for second project\n\
    Build settings for action archive target second\n  \
    TARGETNAME = second\n  \
    ARCH = arm64\n  \
    PATH = some path\n";

  fn map(pairs: &[(&str, &str)]) -> SettingsMap {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
  }

  fn loader(source: &FakeSource) -> SettingsLoader<&FakeSource> {
    SettingsLoader::with_config(
      source,
      LoaderConfig {
        identity_keys: IdentityKeys::new(["TARGETNAME", "ARCH"]),
      },
    )
  }

  #[test]
  fn saves_settings_per_project() {
    let source = FakeSource::default();
    source.set("first_project_path", FIRST_PROJECT);
    source.set("second_project_path", SECOND_PROJECT);
    let mut loader = loader(&source);

    loader.load_settings(Path::new("first_project_path")).unwrap();
    loader.load_settings(Path::new("second_project_path")).unwrap();

    let expected = SettingsContainer::new(
      map(&[("TARGETNAME", "first"), ("ARCH", "armv7"), ("PATH", "some path")]),
      map(&[("TARGETNAME", "first"), ("ARCH", "armv7")]),
    );
    assert_eq!(
      *loader.get_settings(Path::new("first_project_path"), "first").unwrap(),
      expected
    );

    let expected = SettingsContainer::new(
      map(&[
        ("TARGETNAME", "first"),
        ("ARCH", "armv7s"),
        ("PATH", "some path for second project"),
      ]),
      map(&[("TARGETNAME", "first"), ("ARCH", "armv7s")]),
    );
    assert_eq!(
      *loader.get_settings(Path::new("second_project_path"), "first").unwrap(),
      expected
    );
  }

  #[test]
  fn one_container_per_block() {
    let source = FakeSource::default();
    let mut loader = loader(&source);

    let report = loader.load_from_text(Path::new("p"), FIRST_PROJECT).unwrap();

    assert_eq!(report.added, vec!["first", "second"]);
    assert_eq!(loader.targets(Path::new("p")), vec!["first", "second"]);
    let second = loader.get_settings(Path::new("p"), "second").unwrap();
    assert_eq!(
      second.full_settings(),
      &map(&[("TARGETNAME", "second"), ("ARCH", "arm64"), ("PATH", "some path")])
    );
  }

  #[test]
  fn reload_of_identical_text_keeps_containers() {
    let source = FakeSource::default();
    source.set("p", FIRST_PROJECT);
    let mut loader = loader(&source);
    let project = Path::new("p");

    loader.load_settings(project).unwrap();
    let before = loader.get_settings(project, "first").unwrap();

    let report = loader.load_settings(project).unwrap();
    let after = loader.get_settings(project, "first").unwrap();

    assert!(!report.has_changes());
    assert_eq!(report.unchanged, vec!["first", "second"]);
    assert_eq!(before, after);
    assert!(Arc::ptr_eq(&before, &after));
  }

  #[test]
  fn reload_of_different_text_replaces_container() {
    let source = FakeSource::default();
    source.set("p", FIRST_PROJECT);
    let mut loader = loader(&source);
    let project = Path::new("p");

    loader.load_settings(project).unwrap();
    let before = loader.get_settings(project, "first").unwrap();

    source.set("p", &FIRST_PROJECT.replacen("PATH = some path", "PATH = another path", 1));
    let report = loader.load_settings(project).unwrap();
    let after = loader.get_settings(project, "first").unwrap();

    assert_eq!(report.changed, vec!["first"]);
    assert_eq!(report.unchanged, vec!["second"]);
    assert_ne!(before, after);
    assert!(before.is_identity_equal(&after));
  }

  #[test]
  fn targets_missing_from_reload_are_dropped() {
    let source = FakeSource::default();
    let mut loader = loader(&source);
    let project = Path::new("p");

    loader.load_from_text(project, FIRST_PROJECT).unwrap();
    let only_first = "Build settings for action archive target first\n  TARGETNAME = first\n  ARCH = armv7\n  PATH = some path\n";
    let report = loader.load_from_text(project, only_first).unwrap();

    assert_eq!(report.removed, vec!["second"]);
    assert!(matches!(
      loader.get_settings(project, "second"),
      Err(SettingsError::NotFound { .. })
    ));
  }

  #[test]
  fn parse_error_leaves_cache_untouched() {
    let source = FakeSource::default();
    let mut loader = loader(&source);
    let project = Path::new("p");

    loader.load_from_text(project, FIRST_PROJECT).unwrap();
    let err = loader.load_from_text(project, "  A = 1\n").unwrap_err();

    assert!(matches!(err, SettingsError::Parse { .. }));
    assert_eq!(loader.targets(project), vec!["first", "second"]);
  }

  #[test]
  fn unknown_target_is_not_found() {
    let source = FakeSource::default();
    let mut loader = loader(&source);
    loader.load_from_text(Path::new("p"), FIRST_PROJECT).unwrap();

    let err = loader.get_settings(Path::new("p"), "third").unwrap_err();
    assert!(matches!(err, SettingsError::NotFound { ref target, .. } if target == "third"));
  }

  #[test]
  fn unknown_project_is_not_loaded() {
    let source = FakeSource::default();
    let loader = loader(&source);

    let err = loader.get_settings(Path::new("never"), "first").unwrap_err();
    assert!(matches!(err, SettingsError::ProjectNotLoaded(_)));
  }

  #[test]
  fn empty_project_is_loaded_but_has_no_targets() {
    let source = FakeSource::default();
    let mut loader = loader(&source);
    loader.load_from_text(Path::new("p"), "").unwrap();

    assert!(loader.is_loaded(Path::new("p")));
    assert!(matches!(
      loader.get_settings(Path::new("p"), "first"),
      Err(SettingsError::NotFound { .. })
    ));
  }

  #[test]
  fn source_error_is_propagated() {
    let source = FakeSource::default();
    let mut loader = loader(&source);
    let err = loader.load_settings(Path::new("missing")).unwrap_err();
    assert!(matches!(err, SettingsError::Source { .. }));
    assert!(!loader.is_loaded(Path::new("missing")));
  }

  #[test]
  fn snapshot_round_trips_through_cache() {
    let source = FakeSource::default();
    let mut loader = loader(&source);
    let project = Path::new("p");
    loader.load_from_text(project, FIRST_PROJECT).unwrap();

    let snapshot = loader.snapshot(project, "Release-iphoneos-generic-archive-").unwrap();
    assert_eq!(snapshot.targets.len(), 2);
    assert_eq!(snapshot.arguments_state, "Release-iphoneos-generic-archive-");

    let mut fresh = SettingsLoader::new(&source);
    fresh.insert_snapshot(&snapshot);
    assert_eq!(
      fresh.get_settings(project, "first").unwrap(),
      loader.get_settings(project, "first").unwrap()
    );
  }

  #[test]
  fn snapshot_of_unknown_project_fails() {
    let source = FakeSource::default();
    let loader = loader(&source);
    assert!(matches!(
      loader.snapshot(Path::new("p"), ""),
      Err(SettingsError::ProjectNotLoaded(_))
    ));
  }
}
