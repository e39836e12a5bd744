//! Mtime collection for watched inputs.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use rustc_hash::FxHashMap;

/// Get the modification time of a file
///
/// Returns `None` if the file doesn't exist or mtime cannot be read
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

/// Collect modification times for a set of paths.
///
/// The result is a partial map: paths whose mtime cannot be read are
/// omitted, which the dirty-check treats as "infinitely new".
pub fn collect_timestamps(paths: &[PathBuf]) -> FxHashMap<PathBuf, SystemTime> {
    paths
        .iter()
        .filter_map(|p| get_mtime(p).map(|ts| (p.clone(), ts)))
        .collect()
}
