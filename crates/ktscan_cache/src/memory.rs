//! In-memory key-value store.
//!
//! Serves as the host-simulation store in tests and as the current-run
//! sink when no disk persistence is wanted. One instance can act as a
//! previous-run snapshot (seeded up front, then only read) or as a
//! current-run sink (starts empty, write-once per key).

use crate::error::CacheError;
use crate::store::{ReadCache, WriteCache};
use std::collections::HashMap;
use std::sync::Mutex;

/// A thread-safe in-memory key-value store with write-once semantics.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Inserts an entry unconditionally, bypassing write-once enforcement.
    ///
    /// Used to populate a store that represents a previous-run snapshot.
    pub fn seed(&self, key: &str, value: &[u8]) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), value.to_vec());
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of all entries, for end-of-run inspection.
    pub fn entries(&self) -> HashMap<String, Vec<u8>> {
        self.entries.lock().unwrap().clone()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadCache for MemoryCache {
    fn read(&self, key: &str) -> Option<Vec<u8>> {
        let entries = self.entries.lock().unwrap();
        entries.get(key).cloned()
    }
}

impl WriteCache for MemoryCache {
    fn write(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().unwrap();
        if entries.contains_key(key) {
            return Err(CacheError::DuplicateKey {
                key: key.to_string(),
            });
        }
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn written(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read() {
        let cache = MemoryCache::new();
        cache.write("k", b"v").unwrap();
        assert_eq!(cache.read("k"), Some(b"v".to_vec()));
        assert!(cache.written("k"));
    }

    #[test]
    fn read_missing_is_none() {
        let cache = MemoryCache::new();
        assert_eq!(cache.read("k"), None);
        assert!(!cache.written("k"));
    }

    #[test]
    fn duplicate_write_rejected() {
        let cache = MemoryCache::new();
        cache.write("k", b"first").unwrap();
        let err = cache.write("k", b"second").unwrap_err();
        assert!(matches!(err, CacheError::DuplicateKey { .. }));
        assert_eq!(cache.read("k"), Some(b"first".to_vec()));
    }

    #[test]
    fn seed_overwrites() {
        let cache = MemoryCache::new();
        cache.seed("k", b"old");
        cache.seed("k", b"new");
        assert_eq!(cache.read("k"), Some(b"new".to_vec()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn concurrent_writers_one_winner_per_key() {
        use std::sync::Arc;
        use std::thread;

        let cache = Arc::new(MemoryCache::new());
        let mut handles = Vec::new();
        for i in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                cache.write("shared", format!("writer-{i}").as_bytes())
            }));
        }

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(Result::is_ok)
            .count();
        assert_eq!(successes, 1, "exactly one write per key per run");
        assert_eq!(cache.len(), 1);
    }
}
