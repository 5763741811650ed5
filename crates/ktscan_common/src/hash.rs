//! Content hashing for incremental analysis and cross-run change detection.

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of bytes in a content digest.
pub const DIGEST_LEN: usize = 16;

/// A 128-bit MD5 content digest used to detect unchanged files across runs.
///
/// Two files with the same `ContentHash` are assumed to have identical
/// content. The algorithm is fixed so that a digest stored in a previous
/// run's cache compares byte-exact against one computed in the current run.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; DIGEST_LEN]);

impl ContentHash {
    /// Computes the content hash of a byte slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        let digest = Md5::digest(data);
        Self(digest.into())
    }

    /// Returns the raw digest bytes.
    ///
    /// This is the exact representation stored as a cache value, so the
    /// length and byte order must never change without a cache version bump.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Reconstructs a hash from raw digest bytes read back from a cache.
    ///
    /// Returns `None` if the slice has the wrong length. This is fail-safe:
    /// a truncated or corrupted cache value becomes a mismatch, not an error.
    pub fn from_raw(bytes: &[u8]) -> Option<Self> {
        let raw: [u8; DIGEST_LEN] = bytes.try_into().ok()?;
        Some(Self(raw))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}
