//! Disk-backed run-to-run cache store.
//!
//! Persists the cache as a single `cache.bin` file in the cache directory:
//! a bincode-encoded image with a format version and the key-value entries.
//! Loading is fail-safe: a missing file, a version mismatch, or a decode
//! failure yields an empty snapshot and therefore a full reanalysis, never
//! an error.

use crate::error::CacheError;
use crate::store::{ReadCache, WriteCache};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Name of the cache image file within the cache directory.
const CACHE_FILE: &str = "cache.bin";

/// Current image format version. Increment on breaking changes to the
/// entry encoding or the key namespaces.
const FORMAT_VERSION: u32 = 1;

/// Serialized form of one run's cache state.
#[derive(Serialize, Deserialize)]
struct CacheImage {
    format_version: u32,
    entries: HashMap<String, Vec<u8>>,
}

/// A cache store persisted across runs in a local directory.
///
/// On open, the previous run's image becomes the read-only snapshot and an
/// empty sink starts collecting this run's entries. Nothing touches disk
/// again until [`commit`](DiskCache::commit) persists the sink atomically.
pub struct DiskCache {
    dir: PathBuf,
    snapshot: HashMap<String, Vec<u8>>,
    sink: Mutex<HashMap<String, Vec<u8>>>,
}

impl DiskCache {
    /// Opens the cache directory, loading the previous run as snapshot.
    pub fn open(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            snapshot: load_image(&dir.join(CACHE_FILE)),
            sink: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the number of entries inherited from the previous run.
    pub fn snapshot_len(&self) -> usize {
        self.snapshot.len()
    }

    /// Persists the current-run sink as the image the next run will load.
    ///
    /// Writes to a temporary file first and renames it into place, so a
    /// crash mid-commit leaves the previous image intact.
    pub fn commit(&self) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| CacheError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        let image = CacheImage {
            format_version: FORMAT_VERSION,
            entries: self.sink.lock().unwrap().clone(),
        };
        let bytes = bincode::serde::encode_to_vec(&image, bincode::config::standard()).map_err(
            |e| CacheError::Serialization {
                reason: e.to_string(),
            },
        )?;

        let tmp = self.dir.join(format!("{CACHE_FILE}.tmp"));
        let path = self.dir.join(CACHE_FILE);
        std::fs::write(&tmp, &bytes).map_err(|e| CacheError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp, &path).map_err(|e| CacheError::Io { path, source: e })
    }
}

/// Loads a cache image, returning empty entries on any failure.
fn load_image(path: &Path) -> HashMap<String, Vec<u8>> {
    let Ok(raw) = std::fs::read(path) else {
        return HashMap::new();
    };
    let Ok((image, _)) =
        bincode::serde::decode_from_slice::<CacheImage, _>(&raw, bincode::config::standard())
    else {
        return HashMap::new();
    };
    if image.format_version != FORMAT_VERSION {
        return HashMap::new();
    }
    image.entries
}

impl ReadCache for DiskCache {
    fn read(&self, key: &str) -> Option<Vec<u8>> {
        self.snapshot.get(key).cloned()
    }
}

impl WriteCache for DiskCache {
    fn write(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        let mut sink = self.sink.lock().unwrap();
        if sink.contains_key(key) {
            return Err(CacheError::DuplicateKey {
                key: key.to_string(),
            });
        }
        sink.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn written(&self, key: &str) -> bool {
        self.sink.lock().unwrap().contains_key(key)
    }
}
