//! Resolved build settings of a single target.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_IDENTITY_KEYS, TARGET_NAME_KEY};

/// Setting key -> value, ordered so snapshots serialize deterministically.
pub type SettingsMap = BTreeMap<String, String>;

/// The set of setting keys that define a target's build identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityKeys(BTreeSet<String>);

impl IdentityKeys {
  pub fn new<I, K>(keys: I) -> Self
  where
    I: IntoIterator<Item = K>,
    K: Into<String>,
  {
    Self(keys.into_iter().map(Into::into).collect())
  }

  pub fn contains(&self, key: &str) -> bool {
    self.0.contains(key)
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.0.iter().map(String::as_str)
  }

  /// Filter `settings` down to the identity keys.
  pub fn select(&self, settings: &SettingsMap) -> SettingsMap {
    settings
      .iter()
      .filter(|(key, _)| self.contains(key.as_str()))
      .map(|(key, value)| (key.clone(), value.clone()))
      .collect()
  }
}

impl Default for IdentityKeys {
  fn default() -> Self {
    Self::new(DEFAULT_IDENTITY_KEYS.iter().copied())
  }
}

/// Immutable build settings of one target.
///
/// Holds every reported key in `full_settings` and the identity subset in
/// `identity_settings`. Two containers are equal iff both maps are equal.
/// Keys and values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsContainer {
  full_settings: SettingsMap,
  identity_settings: SettingsMap,
}

impl SettingsContainer {
  pub fn new(full_settings: SettingsMap, identity_settings: SettingsMap) -> Self {
    Self {
      full_settings,
      identity_settings,
    }
  }

  /// Build a container deriving the identity subset from `full_settings`.
  pub fn from_full(full_settings: SettingsMap, identity_keys: &IdentityKeys) -> Self {
    let identity_settings = identity_keys.select(&full_settings);
    Self::new(full_settings, identity_settings)
  }

  pub fn full_settings(&self) -> &SettingsMap {
    &self.full_settings
  }

  pub fn identity_settings(&self) -> &SettingsMap {
    &self.identity_settings
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.full_settings.get(key).map(String::as_str)
  }

  /// The `TARGETNAME` setting, if reported.
  pub fn target_name(&self) -> Option<&str> {
    self.get(TARGET_NAME_KEY)
  }

  /// Compare only the identity subsets.
  pub fn is_identity_equal(&self, other: &SettingsContainer) -> bool {
    self.identity_settings == other.identity_settings
  }

  /// Keys whose value differs between `self` and `other`, including keys
  /// present on one side only. Sorted.
  pub fn changed_keys<'a>(&'a self, other: &'a SettingsContainer) -> Vec<&'a str> {
    let keys: BTreeSet<&str> = self
      .full_settings
      .keys()
      .chain(other.full_settings.keys())
      .map(String::as_str)
      .collect();

    keys
      .into_iter()
      .filter(|key| self.full_settings.get(*key) != other.full_settings.get(*key))
      .collect()
  }
}
