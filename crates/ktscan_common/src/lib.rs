//! Shared primitives for the ktscan analyzer.

#![warn(missing_docs)]

mod hash;

pub use hash::ContentHash;
