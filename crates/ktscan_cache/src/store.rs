//! The narrow key-value contract between the sensor and the host cache.
//!
//! The host owns the two stores: a read-only snapshot of the previous run
//! and a write-only sink for the current run. The sensor sees them only
//! through [`ReadCache`] and [`WriteCache`], plus the coupling type
//! [`AnalysisCache`] which also carries the "cache enabled" capability flag.

use crate::error::CacheError;
use std::sync::Arc;

/// Read access to the previous run's cache snapshot.
pub trait ReadCache: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    fn read(&self, key: &str) -> Option<Vec<u8>>;
}

/// Write access to the current run's cache sink.
///
/// A key may be successfully written at most once per run. Implementations
/// must serialize writes so the invariant holds even when parser workers
/// write concurrently.
pub trait WriteCache: Send + Sync {
    /// Stores `value` under `key`.
    ///
    /// Fails with [`CacheError::DuplicateKey`] if the key was already
    /// written this run; the previously written value is retained.
    fn write(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;

    /// Returns `true` if `key` has already been written this run.
    fn written(&self, key: &str) -> bool;
}

/// The logical versioned store one analysis run operates on.
///
/// Couples the optional previous-run snapshot, the current-run sink, and
/// the host's "cache enabled" capability flag. When disabled, reads report
/// absent and writes are no-ops; the classifier logs this state so it is
/// distinguishable from "no entry found".
pub struct AnalysisCache {
    snapshot: Option<Arc<dyn ReadCache>>,
    sink: Arc<dyn WriteCache>,
    enabled: bool,
}

impl AnalysisCache {
    /// Creates a cache from host-provided stores.
    ///
    /// A first-ever run has no snapshot; every prior-entry lookup then
    /// reports absent and all files classify as added.
    pub fn new(
        snapshot: Option<Arc<dyn ReadCache>>,
        sink: Arc<dyn WriteCache>,
        enabled: bool,
    ) -> Self {
        Self {
            snapshot,
            sink,
            enabled,
        }
    }

    /// Creates a disabled cache: reads report absent, writes are no-ops.
    pub fn disabled() -> Self {
        Self {
            snapshot: None,
            sink: Arc::new(crate::MemoryCache::new()),
            enabled: false,
        }
    }

    /// Returns `true` if the host enabled the cache for this run.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Reads an entry from the previous-run snapshot.
    ///
    /// Reports absent when the cache is disabled or no snapshot exists.
    pub fn read(&self, key: &str) -> Option<Vec<u8>> {
        if !self.enabled {
            return None;
        }
        self.snapshot.as_ref()?.read(key)
    }

    /// Writes an entry into the current-run sink.
    ///
    /// A no-op when the cache is disabled. Duplicate keys fail with
    /// [`CacheError::DuplicateKey`] and leave the first value in place.
    pub fn write(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        if !self.enabled {
            return Ok(());
        }
        self.sink.write(key, value)
    }

    /// Returns `true` if `key` has already been written this run.
    pub fn written(&self, key: &str) -> bool {
        self.enabled && self.sink.written(key)
    }
}
