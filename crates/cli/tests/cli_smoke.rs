//! CLI smoke tests for xcarchive.
//!
//! A shell script stands in for xcodebuild: it prints `settings.txt` for
//! `-showBuildSettings` and otherwise records the build in `builds.log`.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the xcarchive binary.
fn xcarchive_cmd() -> Command {
  cargo_bin_cmd!("xcarchive")
}

const SETTINGS: &str = "Build settings for action archive and target Core:
    TARGETNAME = Core
    PRODUCT_NAME = Core
    SWIFT_VERSION = 5.0

Build settings for action archive and target App:
    TARGETNAME = App
    PRODUCT_NAME = App
    SWIFT_VERSION = 5.0
";

const MANIFEST: &str = r#"{
  "project": "App.xcodeproj",
  "target": "App",
  "targets": [
    { "name": "Core" },
    { "name": "App", "dependencies": ["Core"] }
  ]
}"#;

const FAKE_XCODEBUILD: &str = r#"#!/bin/sh
dir="$(dirname "$0")"
for arg in "$@"; do
  if [ "$arg" = "-showBuildSettings" ]; then
    cat "$dir/settings.txt"
    exit 0
  fi
done
echo "$@" >> "$dir/builds.log"
exit "${FAKE_BUILD_EXIT:-0}"
"#;

struct Fixture {
  temp: TempDir,
}

impl Fixture {
  fn new() -> Self {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("xcarchive.json"), MANIFEST).unwrap();
    std::fs::write(temp.path().join("settings.txt"), SETTINGS).unwrap();
    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      let script = temp.path().join("xcodebuild");
      std::fs::write(&script, FAKE_XCODEBUILD).unwrap();
      std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
    Self { temp }
  }

  fn path(&self) -> &Path {
    self.temp.path()
  }

  fn cmd(&self, subcommand: &str) -> Command {
    let mut cmd = xcarchive_cmd();
    cmd
      .arg(subcommand)
      .arg("--cache-dir")
      .arg(self.path().join("cache"))
      .arg("--xcodebuild")
      .arg(self.path().join("xcodebuild"));
    cmd
  }

  fn rebuild_cmd(&self, subcommand: &str) -> Command {
    let mut cmd = self.cmd(subcommand);
    cmd.arg(self.path().join("xcarchive.json"));
    if subcommand == "build" {
      cmd.arg("--derived-data").arg(self.path().join("DerivedData"));
    }
    cmd
  }

  fn build_count(&self) -> usize {
    std::fs::read_to_string(self.path().join("builds.log"))
      .map(|log| log.lines().count())
      .unwrap_or(0)
  }

  fn settings_cache(&self) -> PathBuf {
    self.path().join("cache").join("settings")
  }
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  xcarchive_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  xcarchive_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("xcarchive"));
}

#[test]
fn subcommand_help_works() {
  for cmd in &["plan", "build", "settings", "info"] {
    xcarchive_cmd()
      .arg(cmd)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("Usage"));
  }
}

// =============================================================================
// info
// =============================================================================

#[test]
fn info_reports_cache_dir() {
  let temp = TempDir::new().unwrap();
  let cache = temp.path().join("cache");

  xcarchive_cmd()
    .arg("info")
    .arg("--json")
    .arg("--cache-dir")
    .arg(&cache)
    .assert()
    .success()
    .stdout(predicate::str::contains("settings_dir"))
    .stdout(predicate::str::contains(cache.to_string_lossy().as_ref()));
}

// =============================================================================
// plan
// =============================================================================

#[test]
fn plan_fails_without_manifest() {
  let temp = TempDir::new().unwrap();

  xcarchive_cmd()
    .arg("plan")
    .arg(temp.path().join("missing.json"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to load graph manifest"));
}

#[test]
fn plan_rejects_cyclic_manifest() {
  let temp = TempDir::new().unwrap();
  let manifest = temp.path().join("cyclic.json");
  std::fs::write(
    &manifest,
    r#"{"project": "App.xcodeproj", "target": "A", "targets": [
      {"name": "A", "dependencies": ["B"]}, {"name": "B", "dependencies": ["A"]}
    ]}"#,
  )
  .unwrap();

  xcarchive_cmd()
    .arg("plan")
    .arg(&manifest)
    .assert()
    .failure()
    .stderr(predicate::str::contains("cycle"));
}

#[cfg(unix)]
#[test]
fn first_plan_marks_every_target() {
  let fixture = Fixture::new();

  fixture
    .rebuild_cmd("plan")
    .assert()
    .success()
    .stdout(predicate::str::contains("Would rebuild 2 target(s)"))
    .stdout(predicate::str::contains("no cached settings"));

  assert_eq!(fixture.build_count(), 0);
  assert!(!fixture.settings_cache().exists());
}

#[cfg(unix)]
#[test]
fn plan_json_lists_targets() {
  let fixture = Fixture::new();

  fixture
    .rebuild_cmd("plan")
    .arg("--json")
    .assert()
    .success()
    .stdout(predicate::str::contains("\"should_rebuild\": true"))
    .stdout(predicate::str::contains("\"name\": \"Core\""));
}

#[cfg(unix)]
#[test]
fn plan_rejects_unknown_forced_target() {
  let fixture = Fixture::new();

  fixture
    .rebuild_cmd("plan")
    .arg("--force")
    .arg("Nope")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Nope"));
}

// =============================================================================
// build
// =============================================================================

#[cfg(unix)]
#[test]
fn build_runs_once_then_is_up_to_date() {
  let fixture = Fixture::new();

  fixture.rebuild_cmd("build").assert().success();
  assert_eq!(fixture.build_count(), 1);

  fixture
    .rebuild_cmd("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("Everything is up to date"));
  assert_eq!(fixture.build_count(), 1);
}

#[cfg(unix)]
#[test]
fn changed_dependency_triggers_rebuild() {
  let fixture = Fixture::new();
  fixture.rebuild_cmd("build").assert().success();

  std::fs::write(
    fixture.path().join("settings.txt"),
    SETTINGS.replacen("SWIFT_VERSION = 5.0", "SWIFT_VERSION = 6.0", 1),
  )
  .unwrap();

  fixture
    .rebuild_cmd("plan")
    .assert()
    .success()
    .stdout(predicate::str::contains("depends on Core"));

  fixture.rebuild_cmd("build").assert().success();
  assert_eq!(fixture.build_count(), 2);
}

#[cfg(unix)]
#[test]
fn failed_build_keeps_cache_stale() {
  let fixture = Fixture::new();

  fixture
    .rebuild_cmd("build")
    .env("FAKE_BUILD_EXIT", "1")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to build scheme App"));
  assert!(!fixture.settings_cache().exists());

  fixture
    .rebuild_cmd("plan")
    .assert()
    .success()
    .stdout(predicate::str::contains("Would rebuild 2 target(s)"));
}

#[cfg(unix)]
#[test]
fn changed_configuration_rebuilds_everything() {
  let fixture = Fixture::new();
  fixture.rebuild_cmd("build").assert().success();

  fixture
    .rebuild_cmd("plan")
    .arg("--configuration")
    .arg("Debug")
    .assert()
    .success()
    .stdout(predicate::str::contains("build arguments changed"));
}

// =============================================================================
// settings
// =============================================================================

#[cfg(unix)]
#[test]
fn settings_lists_targets() {
  let fixture = Fixture::new();

  fixture
    .cmd("settings")
    .arg(fixture.path().join("App.xcodeproj"))
    .assert()
    .success()
    .stdout(predicate::str::contains("2 target(s)"))
    .stdout(predicate::str::contains("Core"));
}

#[cfg(unix)]
#[test]
fn settings_shows_identity_of_one_target() {
  let fixture = Fixture::new();

  fixture
    .cmd("settings")
    .arg(fixture.path().join("App.xcodeproj"))
    .arg("--target")
    .arg("App")
    .arg("--identity")
    .arg("--json")
    .assert()
    .success()
    .stdout(predicate::str::contains("\"TARGETNAME\": \"App\""))
    .stdout(predicate::str::contains("SWIFT_VERSION").not());
}

#[cfg(unix)]
#[test]
fn settings_for_unknown_target_fails() {
  let fixture = Fixture::new();

  fixture
    .cmd("settings")
    .arg(fixture.path().join("App.xcodeproj"))
    .arg("--target")
    .arg("Missing")
    .assert()
    .failure();
}
