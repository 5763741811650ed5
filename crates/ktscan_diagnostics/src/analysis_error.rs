//! Host-visible per-file analysis error records.

use ktscan_source::FileKey;
use serde::{Deserialize, Serialize};

/// A 1-indexed line/column pointer into a file.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TextPointer {
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column number.
    pub column: u32,
}

impl TextPointer {
    /// Creates a pointer from 1-indexed coordinates.
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A per-file analysis failure surfaced to the host.
///
/// Emitted for files that could not be read or parsed. The failure is tied
/// to the specific file and never aborts the run; sibling files continue to
/// be analyzed.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisError {
    /// The key of the file the failure applies to.
    pub file_key: String,
    /// Human-readable description of the failure.
    pub message: String,
    /// Pointer to the failure site, when the parser could locate it.
    /// Read failures have no location.
    pub location: Option<TextPointer>,
}

impl AnalysisError {
    /// Creates an error record with a location pointer.
    pub fn at(file_key: &FileKey, message: impl Into<String>, location: TextPointer) -> Self {
        Self {
            file_key: file_key.as_str().to_string(),
            message: message.into(),
            location: Some(location),
        }
    }

    /// Creates an error record with no location (e.g. a read failure).
    pub fn whole_file(file_key: &FileKey, message: impl Into<String>) -> Self {
        Self {
            file_key: file_key.as_str().to_string(),
            message: message.into(),
            location: None,
        }
    }
}
