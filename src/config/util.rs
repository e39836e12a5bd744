//! Config file discovery.

use std::path::{Path, PathBuf};

/// Search upward from the current directory for the config file.
///
/// Returns the first existing `dir/<file_name>` walking from cwd to the
/// filesystem root, or `None` if no config file is found.
pub fn find_config_file(file_name: &Path) -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let candidate = dir.join(file_name);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}
