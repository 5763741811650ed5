//! Cache key derivation and content digests.
//!
//! Keys are derived from file identity only, never from content, so a
//! file's entries can be found again next run regardless of what changed
//! inside it. The key namespaces are part of the persistent cache format
//! and are versioned with it.

use ktscan_common::ContentHash;
use ktscan_source::FileKey;

/// Key namespace for per-file content digest entries.
pub const CONTENT_HASH_PREFIX: &str = "contentHash:";

/// Key namespace for per-file duplicate-detection token entries.
pub const CPD_TOKENS_PREFIX: &str = "cpdTokens:";

/// Returns the cache key holding the content digest of `file_key`.
pub fn content_hash_key(file_key: &FileKey) -> String {
    format!("{CONTENT_HASH_PREFIX}{file_key}")
}

/// Returns the cache key holding the CPD tokens of `file_key`.
pub fn cpd_tokens_key(file_key: &FileKey) -> String {
    format!("{CPD_TOKENS_PREFIX}{file_key}")
}

/// Computes the digest stored under [`content_hash_key`] for file content.
///
/// Digesting already-read bytes cannot fail; there is no error path here.
pub fn digest(content: &str) -> ContentHash {
    ContentHash::from_bytes(content.as_bytes())
}
