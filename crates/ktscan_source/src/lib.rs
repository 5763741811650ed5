//! Analyzed-file model for the ktscan sensor.
//!
//! An analysis batch is a set of [`InputFile`]s: the file's stable key, its
//! textual content, the change status reported by the host, and a lazily
//! computed content digest. The host owns file storage; everything here is
//! created per run and never mutated.

#![warn(missing_docs)]

mod file_key;
mod input_file;
mod line_index;
mod reader;

pub use file_key::FileKey;
pub use input_file::{InputFile, InputStatus};
pub use line_index::LineIndex;
pub use reader::{FileReader, FsReader, ReadError};
