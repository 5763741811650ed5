//! Per-file incremental classification.
//!
//! Decides, for each file of the current batch, whether it can be skipped
//! because its content is proven unchanged since the previous run. The
//! content digest is authoritative whenever the hash cache is usable; the
//! host-reported file status is only a secondary signal for the fallback
//! paths.

use crate::fingerprint::content_hash_key;
use crate::store::AnalysisCache;
use ktscan_common::ContentHash;
use ktscan_diagnostics::EventLog;
use ktscan_source::{FileKey, InputFile, InputStatus};
use std::collections::HashMap;

/// How one file relates to the previous analysis run.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Classification {
    /// Content is identical to the previous run; prior findings can be
    /// reused and the file's cache entries migrate forward unchanged.
    Skip,
    /// The file existed before and its content changed; reanalyze.
    Changed,
    /// No prior record of the file exists; analyze for the first time.
    Added,
}

impl Classification {
    /// Returns `true` if the file must be parsed and analyzed this run.
    pub fn requires_analysis(self) -> bool {
        !matches!(self, Classification::Skip)
    }
}

/// The classification of a whole batch, derived per run and never persisted.
pub struct ClassificationSummary {
    classifications: HashMap<FileKey, Classification>,
    to_analyze: usize,
}

impl ClassificationSummary {
    /// Returns the classification of one file, if it was in the batch.
    pub fn classification(&self, key: &FileKey) -> Option<Classification> {
        self.classifications.get(key).copied()
    }

    /// Returns `true` if the file must be parsed and analyzed this run.
    ///
    /// Files missing from the batch are treated as requiring analysis.
    pub fn requires_analysis(&self, key: &FileKey) -> bool {
        self.classification(key)
            .map_or(true, Classification::requires_analysis)
    }

    /// Number of files classified `Changed` or `Added`.
    pub fn to_analyze(&self) -> usize {
        self.to_analyze
    }

    /// Number of files classified `Skip`.
    pub fn skipped(&self) -> usize {
        self.classifications.len() - self.to_analyze
    }

    /// Total number of files classified.
    pub fn total(&self) -> usize {
        self.classifications.len()
    }
}

/// Classifies every file in the batch and logs the analysis summary.
///
/// With `incremental` off, every file is reanalyzed. With the cache off,
/// the host-reported status is the only skip signal: host `Same` still
/// allows a skip. Otherwise the cached digest decides: a match is a skip
/// regardless of host status, a mismatch is changed, and no prior record
/// at all is added. Host `Added` always forces reanalysis.
pub fn classify_batch(
    files: &[InputFile],
    cache: &AnalysisCache,
    incremental: bool,
    log: &EventLog,
) -> ClassificationSummary {
    if !cache.enabled() {
        log.info("Content hash cache is disabled");
    }
    let hashing = incremental && cache.enabled();

    let mut classifications = HashMap::with_capacity(files.len());
    let mut to_analyze = 0;
    let mut change_candidates = 0;

    for file in files {
        let classification = if !incremental {
            Classification::Changed
        } else if !hashing {
            match file.status() {
                InputStatus::Same => Classification::Skip,
                InputStatus::Added => Classification::Added,
                _ => Classification::Changed,
            }
        } else {
            classify_by_digest(file, cache)
        };

        if classification.requires_analysis() {
            to_analyze += 1;
        }
        // The summary line counts files with any change indication: a host
        // status other than Same, or a classification that reanalyzes.
        if file.status() != InputStatus::Same || classification.requires_analysis() {
            change_candidates += 1;
        }
        classifications.insert(file.key().clone(), classification);
    }

    log.info(format!(
        "Only analyzing {to_analyze} changed Kotlin files out of {change_candidates}."
    ));

    ClassificationSummary {
        classifications,
        to_analyze,
    }
}

/// Classifies one file against its cached digest.
fn classify_by_digest(file: &InputFile, cache: &AnalysisCache) -> Classification {
    // A host-reported addition is reanalyzed regardless of cache state.
    if file.status() == InputStatus::Added {
        return Classification::Added;
    }
    match cache.read(&content_hash_key(file.key())) {
        // A malformed stored digest is a mismatch, not an error.
        Some(stored) => match ContentHash::from_raw(&stored) {
            Some(prior) if prior == *file.digest() => Classification::Skip,
            _ => Classification::Changed,
        },
        None => Classification::Added,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::digest;
    use crate::MemoryCache;
    use ktscan_diagnostics::Severity;
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

    fn cache_with_snapshot(snapshot: MemoryCache) -> AnalysisCache {
        AnalysisCache::new(
            Some(Arc::new(snapshot)),
            Arc::new(MemoryCache::new()),
            true,
        )
    }

    fn seed_digest(snapshot: &MemoryCache, name: &str, content: &str) {
        snapshot.seed(
            &content_hash_key(&FileKey::new(format!("proj:{name}"))),
            digest(content).as_bytes(),
        );
    }

    #[test]
    fn matching_digest_skips() {
        let snapshot = MemoryCache::new();
        seed_digest(&snapshot, "a.kt", "val a = 1");
        let cache = cache_with_snapshot(snapshot);
        let log = EventLog::new();

        let files = [file("a.kt", "val a = 1", InputStatus::Same)];
        let summary = classify_batch(&files, &cache, true, &log);
        assert_eq!(
            summary.classification(files[0].key()),
            Some(Classification::Skip)
        );
        assert_eq!(summary.to_analyze(), 0);
        assert_eq!(summary.skipped(), 1);
    }

    #[test]
    fn mismatching_digest_is_changed_even_if_host_says_same() {
        let snapshot = MemoryCache::new();
        seed_digest(&snapshot, "a.kt", "val a = 1");
        let cache = cache_with_snapshot(snapshot);
        let log = EventLog::new();

        let files = [file("a.kt", "val a = 2", InputStatus::Same)];
        let summary = classify_batch(&files, &cache, true, &log);
        assert_eq!(
            summary.classification(files[0].key()),
            Some(Classification::Changed)
        );
    }

    #[test]
    fn no_prior_record_is_added() {
        let cache = cache_with_snapshot(MemoryCache::new());
        let log = EventLog::new();

        let files = [file("new.kt", "val n = 1", InputStatus::Unknown)];
        let summary = classify_batch(&files, &cache, true, &log);
        assert_eq!(
            summary.classification(files[0].key()),
            Some(Classification::Added)
        );
    }

    #[test]
    fn host_added_forces_reanalysis_despite_matching_digest() {
        let snapshot = MemoryCache::new();
        seed_digest(&snapshot, "a.kt", "val a = 1");
        let cache = cache_with_snapshot(snapshot);
        let log = EventLog::new();

        let files = [file("a.kt", "val a = 1", InputStatus::Added)];
        let summary = classify_batch(&files, &cache, true, &log);
        assert_eq!(
            summary.classification(files[0].key()),
            Some(Classification::Added)
        );
    }

    #[test]
    fn matching_digest_skips_even_if_host_says_changed() {
        let snapshot = MemoryCache::new();
        seed_digest(&snapshot, "a.kt", "val a = 1");
        let cache = cache_with_snapshot(snapshot);
        let log = EventLog::new();

        let files = [file("a.kt", "val a = 1", InputStatus::Changed)];
        let summary = classify_batch(&files, &cache, true, &log);
        assert_eq!(
            summary.classification(files[0].key()),
            Some(Classification::Skip)
        );
    }

    #[test]
    fn truncated_stored_digest_is_changed() {
        let snapshot = MemoryCache::new();
        snapshot.seed(
            &content_hash_key(&FileKey::new("proj:a.kt")),
            b"not a digest",
        );
        let cache = cache_with_snapshot(snapshot);
        let log = EventLog::new();

        let files = [file("a.kt", "val a = 1", InputStatus::Same)];
        let summary = classify_batch(&files, &cache, true, &log);
        assert_eq!(
            summary.classification(files[0].key()),
            Some(Classification::Changed)
        );
    }

    #[test]
    fn non_incremental_reanalyzes_everything() {
        let snapshot = MemoryCache::new();
        seed_digest(&snapshot, "a.kt", "val a = 1");
        let cache = cache_with_snapshot(snapshot);
        let log = EventLog::new();

        let files = [file("a.kt", "val a = 1", InputStatus::Same)];
        let summary = classify_batch(&files, &cache, false, &log);
        assert_eq!(
            summary.classification(files[0].key()),
            Some(Classification::Changed)
        );
        assert_eq!(summary.to_analyze(), 1);
    }

    #[test]
    fn disabled_cache_logs_and_falls_back_to_host_status() {
        let cache = AnalysisCache::disabled();
        let log = EventLog::new();

        let files = [
            file("same.kt", "val s = 1", InputStatus::Same),
            file("changed.kt", "val c = 1", InputStatus::Changed),
            file("added.kt", "val a = 1", InputStatus::Added),
        ];
        let summary = classify_batch(&files, &cache, true, &log);

        assert!(log.contains(Severity::Info, "Content hash cache is disabled"));
        assert_eq!(
            summary.classification(files[0].key()),
            Some(Classification::Skip)
        );
        assert_eq!(
            summary.classification(files[1].key()),
            Some(Classification::Changed)
        );
        assert_eq!(
            summary.classification(files[2].key()),
            Some(Classification::Added)
        );
    }

    #[test]
    fn disabled_cache_full_reanalysis_has_equal_counts() {
        let cache = AnalysisCache::disabled();
        let log = EventLog::new();

        let files = [
            file("a.kt", "val a = 1", InputStatus::Changed),
            file("b.kt", "val b = 1", InputStatus::Unknown),
        ];
        classify_batch(&files, &cache, true, &log);
        assert!(log.contains(
            Severity::Info,
            "Only analyzing 2 changed Kotlin files out of 2."
        ));
    }

    #[test]
    fn summary_excludes_hash_skipped_same_files() {
        // Batch: one added, one changed against the cached digest, one
        // unchanged. The summary counts only the two with changes.
        let snapshot = MemoryCache::new();
        seed_digest(&snapshot, "changed.kt", "old content");
        seed_digest(&snapshot, "unchanged.kt", "val u = 1");
        let cache = cache_with_snapshot(snapshot);
        let log = EventLog::new();

        let files = [
            file("added.kt", "val a = 1", InputStatus::Added),
            file("changed.kt", "new content", InputStatus::Changed),
            file("unchanged.kt", "val u = 1", InputStatus::Same),
        ];
        let summary = classify_batch(&files, &cache, true, &log);

        assert_eq!(summary.to_analyze(), 2);
        assert_eq!(summary.skipped(), 1);
        assert!(log.contains(
            Severity::Info,
            "Only analyzing 2 changed Kotlin files out of 2."
        ));
    }

    #[test]
    fn unknown_file_requires_analysis() {
        let cache = AnalysisCache::disabled();
        let log = EventLog::new();
        let summary = classify_batch(&[], &cache, true, &log);
        assert!(summary.requires_analysis(&FileKey::new("proj:ghost.kt")));
        assert_eq!(summary.total(), 0);
    }
}
