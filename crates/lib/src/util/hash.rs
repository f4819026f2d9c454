//! Content hashing for built archives.
//!
//! A pack is identified by the SHA-256 of its archive bytes. Because archives
//! are written deterministically, the same inputs always produce the same hash.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::consts::SHORT_HASH_LEN;

/// A full 64-character SHA-256 hash of an archive.
///
/// # Format
///
/// The hash is a lowercase hexadecimal string (64 characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl ContentHash {
  /// The leading characters used in output file names.
  pub fn short(&self) -> &str {
    &self.0[..SHORT_HASH_LEN.min(self.0.len())]
  }
}

impl std::fmt::Display for ContentHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Hash arbitrary bytes.
pub fn hash_bytes(data: &[u8]) -> ContentHash {
  let mut hasher = Sha256::new();
  hasher.update(data);
  ContentHash(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_is_lowercase_hex_sha256() {
    let hash = hash_bytes(b"hello world");
    assert_eq!(hash.0, "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9");
    assert_eq!(hash.0.len(), 64);
  }

  #[test]
  fn same_bytes_same_hash() {
    assert_eq!(hash_bytes(b"pack"), hash_bytes(b"pack"));
    assert_ne!(hash_bytes(b"pack"), hash_bytes(b"pack2"));
  }

  #[test]
  fn short_hash_is_prefix() {
    let hash = hash_bytes(b"");
    assert_eq!(hash.short(), "e3b0c44");
    assert!(hash.0.starts_with(hash.short()));
  }
}
