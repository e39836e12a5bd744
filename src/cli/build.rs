//! Build and clean commands.
//!
//! One-shot pass sequence: restore snapshot -> run phases -> report ->
//! persist snapshot. Snapshot persistence is best-effort; a failed write
//! only costs the next run its skip.

use std::fs;
use std::time::SystemTime;

use anyhow::{Context as _, Result};

use crate::config::Config;
use crate::core::BuildMode;
use crate::freshness::Snapshot;
use crate::pass::{self, MANIFEST_FILE, PassOutcome};
use crate::utils::plural_count;
use crate::{debug, log, logger};

/// Create the snapshot for a session in the given mode.
///
/// One-shot builds restore the persisted snapshot so an unchanged rerun
/// can skip; watch sessions always start fresh and keep the snapshot in
/// memory across passes.
pub fn session_snapshot(config: &Config, mode: BuildMode, started_at: SystemTime) -> Snapshot {
    if mode.restore_snapshot
        && let Some(snapshot) = Snapshot::restore(config, started_at)
    {
        debug!("cache"; "restored timestamp snapshot");
        return snapshot;
    }
    Snapshot::new(started_at)
}

/// Persist the snapshot, logging failure at debug level.
pub fn persist_snapshot(snapshot: &Snapshot, config: &Config) {
    if let Err(e) = snapshot.persist(config) {
        debug!("cache"; "failed to persist snapshot: {e:#}");
    }
}

/// Run a one-shot build pass.
pub fn run_build(config: &Config) -> Result<()> {
    logger::set_verbose(config.verbose);

    let started_at = SystemTime::now();
    let mut snapshot = session_snapshot(config, BuildMode::ONESHOT, started_at);

    let report = pass::run_pass(config, BuildMode::ONESHOT, &mut snapshot)?;

    match &report.outcome {
        PassOutcome::Skipped => {
            log!("build"; "no watched input changed, sprite is up to date");
        }
        PassOutcome::Rebuilt { file_name } => {
            log!("emit"; "{file_name}");
            for path in &report.written {
                debug!("emit"; "wrote {}", path.display());
            }
            log!("build"; "wrote {}", plural_count(report.written.len(), "file"));
        }
    }

    persist_snapshot(&snapshot, config);
    Ok(())
}

/// Remove the emitted sprite, the manifest, and the snapshot cache.
pub fn run_clean(config: &Config) -> Result<()> {
    let mut removed = 0usize;

    if let Some(name) = Snapshot::last_emitted(config) {
        let sprite = config.output_dir().join(&name);
        if fs::remove_file(&sprite).is_ok() {
            log!("clean"; "removed {}", sprite.display());
            removed += 1;
        }
    }

    let manifest = config.output_dir().join(MANIFEST_FILE);
    if fs::remove_file(&manifest).is_ok() {
        log!("clean"; "removed {}", manifest.display());
        removed += 1;
    }

    let cache_dir = config.cache_dir();
    if cache_dir.exists() {
        fs::remove_dir_all(&cache_dir)
            .with_context(|| format!("failed to remove {}", cache_dir.display()))?;
        log!("clean"; "cleared cache");
        removed += 1;
    }

    if removed == 0 {
        log!("clean"; "nothing to clean");
    }
    Ok(())
}
