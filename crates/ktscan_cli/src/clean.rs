//! `ktscan clean` — discard the project's analysis cache.

use std::path::PathBuf;

use crate::analyze::CACHE_DIR;

/// Runs the `ktscan clean` command. Removing an absent cache is a no-op.
pub fn run(path: Option<&str>) -> Result<i32, Box<dyn std::error::Error>> {
    let cache_dir = PathBuf::from(path.unwrap_or(".")).join(CACHE_DIR);
    if cache_dir.is_dir() {
        std::fs::remove_dir_all(&cache_dir)?;
    }
    Ok(0)
}
