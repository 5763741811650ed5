//! Error types for cache operations.

use std::path::PathBuf;

/// Errors that can occur during cache operations.
///
/// None of these abort an analysis run. Duplicate-key collisions are logged
/// and the write is discarded; I/O and serialization failures on the disk
/// store degrade to cache misses or a skipped commit.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The key has already been written in this run's sink.
    ///
    /// The sink rejects the write and retains the first value, preventing
    /// corruption of data inherited from the previous run under a duplicate
    /// key.
    #[error("key '{key}' has already been written in this run")]
    DuplicateKey {
        /// The colliding cache key.
        key: String,
    },

    /// An I/O error occurred while reading or writing the disk store.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The disk store could not be encoded or decoded.
    #[error("cache serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}
