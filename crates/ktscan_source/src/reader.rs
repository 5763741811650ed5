//! File reading behind a trait seam.
//!
//! The sensor reads file content through [`FileReader`] so that tests can
//! wrap or replace the filesystem with a fault-injecting implementation
//! instead of mocking. Production code uses [`FsReader`].

use std::path::{Path, PathBuf};

/// Failure to read a file's content from the host storage.
#[derive(Debug, thiserror::Error)]
#[error("cannot read {path}: {source}")]
pub struct ReadError {
    /// The path that could not be read.
    pub path: PathBuf,
    /// The underlying I/O error.
    pub source: std::io::Error,
}

/// Provides the textual content of analyzed files.
pub trait FileReader: Send + Sync {
    /// Reads the full content of the file at `path`.
    fn read(&self, path: &Path) -> Result<String, ReadError>;
}

/// The production reader backed by the local filesystem.
pub struct FsReader;

impl FileReader for FsReader {
    fn read(&self, path: &Path) -> Result<String, ReadError> {
        std::fs::read_to_string(path).map_err(|e| ReadError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
