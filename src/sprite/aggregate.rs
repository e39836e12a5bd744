//! Input aggregation: fan-out reads, configuration-order reassembly.

use std::fs;
use std::path::PathBuf;

use jwalk::WalkDir;
use rayon::prelude::*;
use thiserror::Error;

use crate::debug;

/// Errors from the aggregation step.
#[derive(Debug, Error)]
pub enum SpriteError {
    /// A configured input could not be read. Fails the pass with the
    /// offending path attached.
    #[error("input `{path}` is unreadable")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Expansion produced no inputs (e.g. all directory entries were empty).
    #[error("no inputs found after expanding the configured files")]
    NoInputs,
}

/// Expand configured entries into the concrete input list.
///
/// File entries pass through unchanged; a directory entry expands to the
/// `.svg` files beneath it in sorted order, keeping expansion
/// deterministic. The order of the configured entries is preserved.
pub fn expand_inputs(files: &[PathBuf]) -> Vec<PathBuf> {
    let mut inputs = Vec::with_capacity(files.len());
    for entry in files {
        if entry.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(entry)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_file())
                .map(|e| e.path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "svg"))
                .collect();
            found.sort();
            inputs.extend(found);
        } else {
            inputs.push(entry.clone());
        }
    }
    inputs
}

/// Read all inputs concurrently, preserving configuration order.
///
/// The reads fan out across the rayon pool and join before returning;
/// the result is keyed by position in `paths`, so completion order
/// never leaks into the sprite's byte layout.
pub fn read_inputs(paths: &[PathBuf]) -> Result<Vec<(PathBuf, String)>, SpriteError> {
    if paths.is_empty() {
        return Err(SpriteError::NoInputs);
    }

    let results: Vec<Result<(PathBuf, String), SpriteError>> = paths
        .par_iter()
        .map(|path| {
            fs::read_to_string(path)
                .map(|content| (path.clone(), content))
                .map_err(|source| SpriteError::InputUnreadable {
                    path: path.clone(),
                    source,
                })
        })
        .collect();

    results.into_iter().collect()
}

/// Concatenate file contents in input order.
pub fn concat_contents(files: &[(PathBuf, String)]) -> String {
    let mut out = String::with_capacity(files.iter().map(|(_, c)| c.len()).sum());
    for (path, content) in files {
        debug!("emit"; "aggregated {} ({} bytes)", path.display(), content.len());
        out.push_str(content);
    }
    out
}
