//! Diff between stored and current build settings.
//!
//! Turns two settings snapshots of the same project into per-target local
//! change signals for rebuild propagation.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::graph::LocalReason;

use super::types::SettingsSnapshot;

/// Per-target comparison of a stored snapshot with the current one.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsDiff {
  /// Targets present in both snapshots with different settings.
  pub changed: Vec<String>,

  /// Targets without stored settings.
  pub added: Vec<String>,

  /// Targets in the stored snapshot only.
  pub removed: Vec<String>,

  /// Targets with equal settings in both snapshots.
  pub unchanged: Vec<String>,

  /// The stored snapshot was taken with different build arguments.
  pub arguments_changed: bool,
}

impl SettingsDiff {
  /// Returns true if no current target is stale.
  pub fn is_empty(&self) -> bool {
    self.changed.is_empty() && self.added.is_empty()
  }

  /// Local rebuild signals, one per stale current target.
  pub fn local_signals(&self) -> Vec<(String, LocalReason)> {
    let changed_reason = if self.arguments_changed {
      LocalReason::ArgumentsChanged
    } else {
      LocalReason::SettingsChanged
    };

    self
      .changed
      .iter()
      .map(|name| (name.clone(), changed_reason))
      .chain(
        self
          .added
          .iter()
          .map(|name| (name.clone(), LocalReason::NoPreviousSettings)),
      )
      .collect()
  }
}

/// Compare `current` against the `previous` snapshot of the same project.
///
/// Without a previous snapshot every current target is `added`. When the
/// build arguments differ, every target present in both counts as `changed`
/// regardless of its settings.
pub fn diff_settings(previous: Option<&SettingsSnapshot>, current: &SettingsSnapshot) -> SettingsDiff {
  let mut diff = SettingsDiff::default();

  let Some(previous) = previous else {
    diff.added = current.targets.keys().cloned().collect();
    return diff;
  };

  diff.arguments_changed = previous.arguments_state != current.arguments_state;
  if diff.arguments_changed {
    debug!(
      previous = %previous.arguments_state,
      current = %current.arguments_state,
      "build arguments changed"
    );
  }

  for (name, container) in &current.targets {
    match previous.targets.get(name) {
      None => diff.added.push(name.clone()),
      Some(stored) if diff.arguments_changed || stored != container => {
        debug!(target = %name, keys = ?stored.changed_keys(container), "settings changed");
        diff.changed.push(name.clone());
      }
      Some(_) => diff.unchanged.push(name.clone()),
    }
  }

  let current_names: BTreeSet<&String> = current.targets.keys().collect();
  diff.removed = previous
    .targets
    .keys()
    .filter(|name| !current_names.contains(name))
    .cloned()
    .collect();

  diff
}
