//! A single file in the current analysis batch.

use crate::FileKey;
use ktscan_common::ContentHash;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Change status of a file as reported by the host scanner.
///
/// This is a secondary signal: when the content-hash cache is available,
/// the digest comparison is authoritative over the host status.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputStatus {
    /// The host believes the file is unchanged since the previous run.
    Same,
    /// The host believes the file content changed.
    Changed,
    /// The host believes the file did not exist in the previous run.
    Added,
    /// The host provided no status information.
    Unknown,
}

/// One file of the current analysis batch.
///
/// Created from host file-system enumeration at the start of a run and
/// destroyed at run end. Never mutated, only reclassified. The content
/// digest is computed at most once, on first use.
#[derive(Debug)]
pub struct InputFile {
    key: FileKey,
    path: PathBuf,
    content: String,
    status: InputStatus,
    digest: OnceLock<ContentHash>,
}

impl InputFile {
    /// Creates a new input file from already-read content.
    pub fn new(key: FileKey, path: PathBuf, content: String, status: InputStatus) -> Self {
        Self {
            key,
            path,
            content,
            status,
            digest: OnceLock::new(),
        }
    }

    /// The stable key identifying this file across runs.
    pub fn key(&self) -> &FileKey {
        &self.key
    }

    /// The filesystem path the content was read from.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// The full textual content of the file.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The host-reported change status.
    pub fn status(&self) -> InputStatus {
        self.status
    }

    /// The content digest, computed lazily on first access.
    pub fn digest(&self) -> &ContentHash {
        self.digest
            .get_or_init(|| ContentHash::from_bytes(self.content.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_file(content: &str, status: InputStatus) -> InputFile {
        InputFile::new(
            FileKey::new("proj:test.kt"),
            PathBuf::from("src/test.kt"),
            content.to_string(),
            status,
        )
    }

    #[test]
    fn digest_matches_content() {
        let f = make_file("fun main() {}", InputStatus::Unknown);
        let expected = ContentHash::from_bytes(b"fun main() {}");
        assert_eq!(*f.digest(), expected);
    }

    #[test]
    fn digest_is_stable_across_calls() {
        let f = make_file("val x = 1", InputStatus::Same);
        let first = *f.digest();
        let second = *f.digest();
        assert_eq!(first, second);
    }

    #[test]
    fn accessors() {
        let f = make_file("class A", InputStatus::Added);
        assert_eq!(f.key().as_str(), "proj:test.kt");
        assert_eq!(f.path(), std::path::Path::new("src/test.kt"));
        assert_eq!(f.content(), "class A");
        assert_eq!(f.status(), InputStatus::Added);
    }
}
