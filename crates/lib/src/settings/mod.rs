//! Build settings: containers, parsing, caching, persistence and diffing.

pub mod container;
pub mod diff;
pub mod loader;
pub mod parser;
pub mod store;
pub mod types;

pub use container::{IdentityKeys, SettingsContainer, SettingsMap};
pub use diff::{SettingsDiff, diff_settings};
pub use loader::{LoaderConfig, SettingsKey, SettingsLoader, SettingsSource};
pub use parser::{TargetBlock, parse_build_settings};
pub use store::SettingsStore;
pub use types::{LoadReport, SNAPSHOT_VERSION, SettingsError, SettingsSnapshot};
