//! Hashing utilities for cache file names.
//!
//! Project paths are arbitrary filesystem paths, so the settings store keys its
//! files by a truncated SHA-256 of the path instead of the path itself.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::consts::OBJ_HASH_PREFIX_LEN;

/// A truncated hash identifying a cached object.
///
/// # Format
///
/// A lowercase hexadecimal string of 20 characters, e.g. `"a1b2c3d4e5f6789012ab"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectHash(pub String);

impl std::fmt::Display for ObjectHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl ObjectHash {
  /// Hash an arbitrary string.
  pub fn of_str(value: &str) -> Self {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let full = hex::encode(hasher.finalize());
    ObjectHash(full[..OBJ_HASH_PREFIX_LEN].to_string())
  }
}
