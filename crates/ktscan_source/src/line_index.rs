//! Line-start indexing for fast byte-offset to line/column lookup.

/// Precomputed line-start offsets for one file's content.
///
/// Used to translate the byte offset of a parse failure into the 1-indexed
/// line/column pointer attached to the reported analysis error.
pub struct LineIndex {
    /// Byte offsets of each line start (the first entry is always 0).
    line_starts: Vec<u32>,
}

impl LineIndex {
    /// Builds the index for the given content.
    pub fn new(content: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, byte) in content.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self { line_starts }
    }

    /// Converts a byte offset into 1-indexed (line, column) coordinates.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line = (line_idx as u32) + 1;
        let col = byte_offset - self.line_starts[line_idx] + 1;
        (line, col)
    }
}
