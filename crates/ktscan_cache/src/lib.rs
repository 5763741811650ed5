//! Incremental-analysis caching for the ktscan sensor.
//!
//! Across runs, the sensor keeps a key-value store of per-file content
//! digests (and derived data such as CPD tokens). At the start of a run the
//! previous run's store is available as a read-only snapshot; the current
//! run writes into a separate sink. This crate decides which files can be
//! skipped because their content is unchanged, and commits the new cache
//! state at the end of the run. Every path through it is fail-safe: a
//! missing, disabled, or corrupted cache degrades to a full reanalysis,
//! never to an aborted run.

#![warn(missing_docs)]

mod classifier;
mod disk;
mod error;
mod fingerprint;
mod memory;
mod migrate;
mod store;

pub use classifier::{classify_batch, Classification, ClassificationSummary};
pub use disk::DiskCache;
pub use error::CacheError;
pub use fingerprint::{content_hash_key, cpd_tokens_key, CONTENT_HASH_PREFIX, CPD_TOKENS_PREFIX};
pub use memory::MemoryCache;
pub use migrate::{write_logged, CacheMigrator};
pub use store::{AnalysisCache, ReadCache, WriteCache};
