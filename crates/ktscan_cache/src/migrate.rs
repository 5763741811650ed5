//! End-of-run cache migration.
//!
//! Snapshot entries are not carried forward automatically: anything the
//! migrator does not copy into the sink is lost when the run commits. For
//! skipped files the previous run's entries are still valid and are copied
//! unmodified; for analyzed files a fresh content digest is written.
//! Derived data for analyzed files (CPD tokens) is written by the
//! downstream collaborator through the same sink before migration runs.

use crate::classifier::{Classification, ClassificationSummary};
use crate::error::CacheError;
use crate::fingerprint::{content_hash_key, cpd_tokens_key};
use crate::store::AnalysisCache;
use ktscan_diagnostics::EventLog;
use ktscan_source::{FileKey, InputFile};

/// Writes a cache entry, logging collisions instead of failing.
///
/// This is the only write path the sensor and the migrator use: a
/// duplicate key produces the contractual warning and leaves the
/// first-written value in place, and any other store failure is logged
/// and swallowed. Nothing that happens here can abort the run.
pub fn write_logged(cache: &AnalysisCache, log: &EventLog, key: &str, value: &[u8]) {
    match cache.write(key, value) {
        Ok(()) => {}
        Err(CacheError::DuplicateKey { key }) => {
            log.warn(format!(
                "Cannot copy key {key} from cache as it has already been written"
            ));
        }
        Err(other) => log.warn(other.to_string()),
    }
}

/// Commits the new cache state once per analysis run.
pub struct CacheMigrator<'a> {
    cache: &'a AnalysisCache,
    log: &'a EventLog,
}

impl<'a> CacheMigrator<'a> {
    /// Creates a migrator over the run's cache and event log.
    pub fn new(cache: &'a AnalysisCache, log: &'a EventLog) -> Self {
        Self { cache, log }
    }

    /// Migrates cache entries for every file in the batch.
    ///
    /// Runs once, after all files are classified and analyzed. Write
    /// collisions are logged and skipped; nothing here can abort the run.
    pub fn commit(&self, files: &[InputFile], summary: &ClassificationSummary) {
        if !self.cache.enabled() {
            return;
        }
        for file in files {
            match summary.classification(file.key()) {
                Some(Classification::Skip) => self.copy_forward(file.key()),
                _ => self.write_fresh(file),
            }
        }
    }

    /// Copies a skipped file's entries unmodified from snapshot to sink.
    ///
    /// A derived-data entry missing from the snapshot is not an error; only
    /// entries that exist are carried forward.
    fn copy_forward(&self, key: &FileKey) {
        for cache_key in [content_hash_key(key), cpd_tokens_key(key)] {
            if let Some(value) = self.cache.read(&cache_key) {
                self.put(&cache_key, &value);
            }
        }
    }

    /// Writes the freshly computed digest for an analyzed file.
    fn write_fresh(&self, file: &InputFile) {
        self.put(&content_hash_key(file.key()), file.digest().as_bytes());
    }

    fn put(&self, key: &str, value: &[u8]) {
        write_logged(self.cache, self.log, key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify_batch;
    use crate::fingerprint::digest;
    use crate::{MemoryCache, ReadCache};
    use ktscan_diagnostics::Severity;
    use ktscan_source::InputStatus;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn file(name: &str, content: &str, status: InputStatus) -> InputFile {
        InputFile::new(
            FileKey::new(format!("proj:{name}")),
            PathBuf::from(name),
            content.to_string(),
            status,
        )
    }

    struct Run {
        cache: AnalysisCache,
        sink: Arc<MemoryCache>,
        log: EventLog,
    }

    fn run_with_snapshot(snapshot: MemoryCache) -> Run {
        let sink = Arc::new(MemoryCache::new());
        Run {
            cache: AnalysisCache::new(Some(Arc::new(snapshot)), sink.clone(), true),
            sink,
            log: EventLog::new(),
        }
    }

    #[test]
    fn skipped_file_entries_are_copied_unchanged() {
        let key = FileKey::new("proj:a.kt");
        let snapshot = MemoryCache::new();
        snapshot.seed(&content_hash_key(&key), digest("val a = 1").as_bytes());
        snapshot.seed(&cpd_tokens_key(&key), b"token blob");
        let run = run_with_snapshot(snapshot);

        let files = [file("a.kt", "val a = 1", InputStatus::Same)];
        let summary = classify_batch(&files, &run.cache, true, &run.log);
        CacheMigrator::new(&run.cache, &run.log).commit(&files, &summary);

        assert_eq!(
            run.sink.read(&content_hash_key(&key)),
            Some(digest("val a = 1").as_bytes().to_vec())
        );
        assert_eq!(run.sink.read(&cpd_tokens_key(&key)), Some(b"token blob".to_vec()));
        assert!(!run.log.has_errors());
    }

    #[test]
    fn skipped_file_without_tokens_copies_only_the_digest() {
        let key = FileKey::new("proj:a.kt");
        let snapshot = MemoryCache::new();
        snapshot.seed(&content_hash_key(&key), digest("val a = 1").as_bytes());
        let run = run_with_snapshot(snapshot);

        let files = [file("a.kt", "val a = 1", InputStatus::Same)];
        let summary = classify_batch(&files, &run.cache, true, &run.log);
        CacheMigrator::new(&run.cache, &run.log).commit(&files, &summary);

        assert!(run.sink.read(&content_hash_key(&key)).is_some());
        assert!(run.sink.read(&cpd_tokens_key(&key)).is_none());
        assert!(run.log.messages_at(Severity::Warn).is_empty());
    }

    #[test]
    fn analyzed_file_gets_fresh_digest() {
        let key = FileKey::new("proj:a.kt");
        let snapshot = MemoryCache::new();
        snapshot.seed(&content_hash_key(&key), digest("old content").as_bytes());
        let run = run_with_snapshot(snapshot);

        let files = [file("a.kt", "new content", InputStatus::Changed)];
        let summary = classify_batch(&files, &run.cache, true, &run.log);
        CacheMigrator::new(&run.cache, &run.log).commit(&files, &summary);

        assert_eq!(
            run.sink.read(&content_hash_key(&key)),
            Some(digest("new content").as_bytes().to_vec())
        );
    }

    #[test]
    fn double_migration_warns_and_keeps_first_value() {
        let key = FileKey::new("proj:a.kt");
        let snapshot = MemoryCache::new();
        snapshot.seed(&content_hash_key(&key), digest("val a = 1").as_bytes());
        let run = run_with_snapshot(snapshot);

        let files = [file("a.kt", "val a = 1", InputStatus::Same)];
        let summary = classify_batch(&files, &run.cache, true, &run.log);
        let migrator = CacheMigrator::new(&run.cache, &run.log);
        migrator.commit(&files, &summary);
        migrator.commit(&files, &summary);

        let expected = format!(
            "Cannot copy key {} from cache as it has already been written",
            content_hash_key(&key)
        );
        assert!(run.log.contains(Severity::Warn, &expected));
        assert_eq!(
            run.sink.read(&content_hash_key(&key)),
            Some(digest("val a = 1").as_bytes().to_vec())
        );
    }

    #[test]
    fn collision_between_fresh_write_and_copy_is_nonfatal() {
        // Two batch entries resolving to the same key: the first write wins,
        // the second logs a warning and the run continues.
        let key = FileKey::new("proj:dup.kt");
        let snapshot = MemoryCache::new();
        snapshot.seed(&content_hash_key(&key), digest("same").as_bytes());
        let run = run_with_snapshot(snapshot);

        let first = file("dup.kt", "other", InputStatus::Changed);
        let second = file("dup.kt", "same", InputStatus::Same);
        let files = [first, second];
        let summary = classify_batch(&files[1..], &run.cache, true, &run.log);

        let migrator = CacheMigrator::new(&run.cache, &run.log);
        // The changed file's digest lands first (written during analysis).
        run.cache
            .write(&content_hash_key(&key), files[0].digest().as_bytes())
            .unwrap();
        migrator.commit(&files[1..], &summary);

        let expected = format!(
            "Cannot copy key {} from cache as it has already been written",
            content_hash_key(&key)
        );
        assert!(run.log.contains(Severity::Warn, &expected));
        assert_eq!(
            run.sink.read(&content_hash_key(&key)),
            Some(digest("other").as_bytes().to_vec()),
            "the first-written value is retained"
        );
    }

    #[test]
    fn disabled_cache_migrates_nothing() {
        let cache = AnalysisCache::disabled();
        let log = EventLog::new();
        let files = [file("a.kt", "val a = 1", InputStatus::Changed)];
        let summary = classify_batch(&files, &cache, true, &log);
        CacheMigrator::new(&cache, &log).commit(&files, &summary);
        assert!(!cache.written(&content_hash_key(files[0].key())));
    }
}
