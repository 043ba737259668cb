pub const APP_NAME: &str = "xcarchive";

/// Environment variable overriding the cache directory.
pub const CACHE_DIR_ENV: &str = "XCARCHIVE_CACHE_DIR";

/// Length of the truncated hash used for snapshot file names.
pub const OBJ_HASH_PREFIX_LEN: usize = 20;

/// Keys that make up a target's identity settings unless configured otherwise.
pub const DEFAULT_IDENTITY_KEYS: &[&str] = &[
  "TARGETNAME",
  "ARCHS",
  "ARCH",
  "PLATFORM_NAME",
  "CONFIGURATION",
  "PRODUCT_NAME",
];

/// Setting holding the target name.
pub const TARGET_NAME_KEY: &str = "TARGETNAME";

/// Default `xcodebuild` action.
pub const ARCHIVE_ACTION: &str = "archive";

/// Destination that is valid for archives on any platform.
pub const GENERIC_DESTINATION: &str = "generic";
