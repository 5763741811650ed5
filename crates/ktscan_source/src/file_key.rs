//! Stable per-file identity keys.

use std::fmt;
use std::path::Path;

/// A stable, path-derived key identifying one analyzed file across runs.
///
/// Cache entries are namespaced by this key, so it must stay identical
/// between runs as long as the file has not moved. Derived from the file
/// path only, never from content.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct FileKey(String);

impl FileKey {
    /// Creates a key from an already-formed string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Derives a key from a module identifier and a project-relative path.
    ///
    /// Path separators are normalized to `/` so keys match across platforms.
    pub fn for_path(module_key: &str, relative_path: &Path) -> Self {
        let normalized = relative_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        Self(format!("{module_key}:{normalized}"))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
