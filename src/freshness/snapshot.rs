//! Timestamp snapshot and the dirty-check decision.
//!
//! A build pass is skipped only when none of the watched inputs changed
//! since the previous snapshot. The snapshot is replaced with the
//! current timestamp map after every check, whether or not the pass
//! rebuilt.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::debug;
use crate::utils::hash;

/// Snapshot file name (inside the cache directory)
const SNAPSHOT_FILE: &str = "snapshot.json";

/// Decide whether any watched input changed against a previous snapshot.
///
/// Policy:
/// - An empty current map or an empty previous snapshot means no
///   timestamp data has been recorded yet: first pass, always changed.
/// - Otherwise a watched file counts as changed iff its current
///   timestamp is strictly newer than its previous one; a file the
///   previous snapshot never saw is compared against `started_at`, and
///   a file missing from the current map is infinitely new.
pub fn dependencies_changed(
    current: &FxHashMap<PathBuf, SystemTime>,
    watched: &FxHashSet<PathBuf>,
    previous: &FxHashMap<PathBuf, SystemTime>,
    started_at: SystemTime,
) -> bool {
    if current.is_empty() || previous.is_empty() {
        return true;
    }

    watched.iter().any(|path| {
        let baseline = previous.get(path).copied().unwrap_or(started_at);
        current.get(path).is_none_or(|ts| *ts > baseline)
    })
}

/// Per-run timestamp snapshot of the watched inputs.
///
/// One instance lives across all passes of a watch session (or is
/// restored from disk for one-shot builds). `check_and_update` is the
/// only mutation point during a pass.
#[derive(Debug)]
pub struct Snapshot {
    /// Watched path -> mtime recorded at the previous check
    entries: FxHashMap<PathBuf, SystemTime>,
    /// Watched input set at the previous check
    watched: FxHashSet<PathBuf>,
    /// Baseline for inputs the snapshot has never seen
    started_at: SystemTime,
    /// Filename of the last emitted sprite
    emitted: Option<String>,
}

/// On-disk form of [`Snapshot`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedSnapshot {
    /// Config file content hash at persist time
    config_hash: u64,
    /// Filename of the last emitted sprite
    #[serde(default)]
    emitted: Option<String>,
    /// Watched input set at persist time
    #[serde(default)]
    watched: Vec<String>,
    /// Watched path -> (secs, nanos) since the Unix epoch
    #[serde(default)]
    entries: FxHashMap<String, (u64, u32)>,
}

impl Snapshot {
    /// Create an empty snapshot; the first check always reports changed.
    pub fn new(started_at: SystemTime) -> Self {
        Self {
            entries: FxHashMap::default(),
            watched: FxHashSet::default(),
            started_at,
            emitted: None,
        }
    }

    /// Run the dirty-check and replace the snapshot with `current`.
    ///
    /// A change to the watched set itself (inputs added or removed since
    /// the previous check) also counts as changed; the per-file policy
    /// alone cannot see an old file that was newly added to the config.
    pub fn check_and_update(
        &mut self,
        current: &FxHashMap<PathBuf, SystemTime>,
        watched: &FxHashSet<PathBuf>,
    ) -> bool {
        let inputs_changed = self.watched != *watched;
        let changed =
            inputs_changed || dependencies_changed(current, watched, &self.entries, self.started_at);

        self.entries = current.clone();
        self.watched = watched.clone();

        changed
    }

    /// Drop all recorded state so the next check reports changed.
    pub fn invalidate(&mut self) {
        self.entries.clear();
        self.watched.clear();
    }

    /// Filename of the last emitted sprite, if any pass emitted one.
    pub fn emitted(&self) -> Option<&str> {
        self.emitted.as_deref()
    }

    /// Record the filename of the sprite emitted this pass.
    pub fn set_emitted(&mut self, name: String) {
        self.emitted = Some(name);
    }

    /// Restore the persisted snapshot for a one-shot build.
    ///
    /// Returns `None` (forcing a rebuild) when there is no usable
    /// persisted state: no snapshot file, a config file that changed
    /// since it was written, or a previously emitted sprite that no
    /// longer exists in the output directory.
    pub fn restore(config: &Config, started_at: SystemTime) -> Option<Self> {
        let path = config.cache_dir().join(SNAPSHOT_FILE);
        let raw = fs::read_to_string(&path).ok()?;
        let persisted: PersistedSnapshot = serde_json::from_str(&raw).ok()?;

        if persisted.config_hash != config_file_hash(config) {
            debug!("cache"; "config changed since snapshot, ignoring cache");
            return None;
        }

        let emitted = persisted.emitted?;
        if !config.output_dir().join(&emitted).exists() {
            debug!("cache"; "emitted sprite missing, ignoring cache");
            return None;
        }

        Some(Self {
            entries: persisted
                .entries
                .into_iter()
                .map(|(p, ts)| (PathBuf::from(p), decode_time(ts)))
                .collect(),
            watched: persisted.watched.into_iter().map(PathBuf::from).collect(),
            started_at,
            emitted: Some(emitted),
        })
    }

    /// Persist the snapshot to the cache directory.
    pub fn persist(&self, config: &Config) -> Result<()> {
        let persisted = PersistedSnapshot {
            config_hash: config_file_hash(config),
            emitted: self.emitted.clone(),
            watched: self
                .watched
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
            entries: self
                .entries
                .iter()
                .map(|(p, ts)| (p.to_string_lossy().into_owned(), encode_time(*ts)))
                .collect(),
        };

        let dir = config.cache_dir();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create cache dir {}", dir.display()))?;
        let json = serde_json::to_string(&persisted)?;
        fs::write(dir.join(SNAPSHOT_FILE), json).context("failed to write snapshot")?;
        Ok(())
    }

    /// Read the last emitted sprite filename without restoring state.
    ///
    /// Used by `clean` to find the output file to remove.
    pub fn last_emitted(config: &Config) -> Option<String> {
        let raw = fs::read_to_string(config.cache_dir().join(SNAPSHOT_FILE)).ok()?;
        let persisted: PersistedSnapshot = serde_json::from_str(&raw).ok()?;
        persisted.emitted
    }
}

/// Content hash of the config file (0 when unreadable).
fn config_file_hash(config: &Config) -> u64 {
    fs::read(&config.config_path)
        .map(|bytes| hash::compute(&bytes))
        .unwrap_or(0)
}

fn encode_time(ts: SystemTime) -> (u64, u32) {
    let d = ts.duration_since(UNIX_EPOCH).unwrap_or_default();
    (d.as_secs(), d.subsec_nanos())
}

fn decode_time((secs, nanos): (u64, u32)) -> SystemTime {
    UNIX_EPOCH + Duration::new(secs, nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn t(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn map(pairs: &[(&str, u64)]) -> FxHashMap<PathBuf, SystemTime> {
        pairs
            .iter()
            .map(|(p, secs)| (PathBuf::from(p), t(*secs)))
            .collect()
    }

    fn set(paths: &[&str]) -> FxHashSet<PathBuf> {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_empty_current_is_changed() {
        let current = FxHashMap::default();
        let previous = map(&[("/a.svg", 100)]);
        assert!(dependencies_changed(
            &current,
            &set(&["/a.svg"]),
            &previous,
            t(50)
        ));
    }

    #[test]
    fn test_empty_previous_is_changed() {
        // First invocation always recomputes, regardless of timestamps
        let current = map(&[("/a.svg", 10)]);
        let previous = FxHashMap::default();
        assert!(dependencies_changed(
            &current,
            &set(&["/a.svg"]),
            &previous,
            t(1000)
        ));
    }

    #[test]
    fn test_unchanged_inputs_skip() {
        let current = map(&[("/a.svg", 100), ("/b.svg", 200)]);
        let previous = current.clone();
        assert!(!dependencies_changed(
            &current,
            &set(&["/a.svg", "/b.svg"]),
            &previous,
            t(50)
        ));
    }

    #[test]
    fn test_single_bumped_input_is_changed() {
        let previous = map(&[("/a.svg", 100), ("/b.svg", 200)]);
        let current = map(&[("/a.svg", 100), ("/b.svg", 201)]);
        assert!(dependencies_changed(
            &current,
            &set(&["/a.svg", "/b.svg"]),
            &previous,
            t(50)
        ));
    }

    #[test]
    fn test_missing_current_timestamp_is_changed() {
        // Watched file absent from the current map counts as infinitely new
        let previous = map(&[("/a.svg", 100), ("/b.svg", 200)]);
        let current = map(&[("/a.svg", 100)]);
        assert!(dependencies_changed(
            &current,
            &set(&["/a.svg", "/b.svg"]),
            &previous,
            t(50)
        ));
    }

    #[test]
    fn test_unseen_file_uses_start_time_baseline() {
        // /b.svg was never snapshotted; older than start = unchanged,
        // newer than start = changed
        let previous = map(&[("/a.svg", 100)]);
        let watched = set(&["/a.svg", "/b.svg"]);

        let current = map(&[("/a.svg", 100), ("/b.svg", 80)]);
        assert!(!dependencies_changed(&current, &watched, &previous, t(90)));

        let current = map(&[("/a.svg", 100), ("/b.svg", 95)]);
        assert!(dependencies_changed(&current, &watched, &previous, t(90)));
    }

    #[test]
    fn test_snapshot_replaced_after_check() {
        let mut snapshot = Snapshot::new(t(0));
        let watched = set(&["/a.svg"]);

        // First pass: empty snapshot, always changed
        let current = map(&[("/a.svg", 100)]);
        assert!(snapshot.check_and_update(&current, &watched));

        // Same timestamps again: snapshot was updated, now clean
        assert!(!snapshot.check_and_update(&current, &watched));

        // Bump and check twice: dirty once, then clean again
        let bumped = map(&[("/a.svg", 101)]);
        assert!(snapshot.check_and_update(&bumped, &watched));
        assert!(!snapshot.check_and_update(&bumped, &watched));
    }

    #[test]
    fn test_watched_set_change_is_changed() {
        let mut snapshot = Snapshot::new(t(0));
        let current = map(&[("/a.svg", 100)]);
        assert!(snapshot.check_and_update(&current, &set(&["/a.svg"])));

        // Adding an old file to the watched set must trigger a rebuild
        // even though its mtime predates the session start
        let current = map(&[("/a.svg", 100), ("/b.svg", 10)]);
        assert!(snapshot.check_and_update(&current, &set(&["/a.svg", "/b.svg"])));
        assert!(!snapshot.check_and_update(&current, &set(&["/a.svg", "/b.svg"])));
    }

    #[test]
    fn test_invalidate_forces_rebuild() {
        let mut snapshot = Snapshot::new(t(0));
        let current = map(&[("/a.svg", 100)]);
        let watched = set(&["/a.svg"]);
        assert!(snapshot.check_and_update(&current, &watched));
        assert!(!snapshot.check_and_update(&current, &watched));

        snapshot.invalidate();
        assert!(snapshot.check_and_update(&current, &watched));
    }

    fn test_config(root: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.root = root.to_path_buf();
        config.config_path = root.join("svgmux.toml");
        config.build.output = root.join("dist");
        config
    }

    #[test]
    fn test_persist_restore_roundtrip() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        fs::create_dir_all(config.output_dir()).unwrap();
        fs::write(config.output_dir().join("sprite.svg"), "<svg/>").unwrap();

        let mut snapshot = Snapshot::new(t(0));
        let current = map(&[("/a.svg", 100)]);
        let watched = set(&["/a.svg"]);
        snapshot.check_and_update(&current, &watched);
        snapshot.set_emitted("sprite.svg".to_string());
        snapshot.persist(&config).unwrap();

        let mut restored = Snapshot::restore(&config, t(500)).expect("snapshot should restore");
        assert_eq!(restored.emitted(), Some("sprite.svg"));
        // Restored state sees the same timestamps as clean
        assert!(!restored.check_and_update(&current, &watched));
    }

    #[test]
    fn test_restore_requires_emitted_output() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());

        let mut snapshot = Snapshot::new(t(0));
        snapshot.check_and_update(&map(&[("/a.svg", 100)]), &set(&["/a.svg"]));
        snapshot.set_emitted("sprite.svg".to_string());
        snapshot.persist(&config).unwrap();

        // Output file was never written: restore must refuse
        assert!(Snapshot::restore(&config, t(500)).is_none());
    }

    #[test]
    fn test_restore_invalidated_by_config_change() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        fs::create_dir_all(config.output_dir()).unwrap();
        fs::write(config.output_dir().join("sprite.svg"), "<svg/>").unwrap();
        fs::write(&config.config_path, "[sprite]\nfiles = [\"a.svg\"]\n").unwrap();

        let mut snapshot = Snapshot::new(t(0));
        snapshot.check_and_update(&map(&[("/a.svg", 100)]), &set(&["/a.svg"]));
        snapshot.set_emitted("sprite.svg".to_string());
        snapshot.persist(&config).unwrap();
        assert!(Snapshot::restore(&config, t(500)).is_some());

        // Rewriting the config file invalidates the persisted snapshot
        fs::write(&config.config_path, "[sprite]\nfiles = [\"b.svg\"]\n").unwrap();
        assert!(Snapshot::restore(&config, t(500)).is_none());
    }
}
