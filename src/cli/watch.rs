//! Watch mode: continuous rebuild on input changes.
//!
//! A recursive watcher covers the parent directories of the configured
//! inputs; the project root is watched non-recursively for config file
//! changes. Events are debounced, then one build pass runs against the
//! session's long-lived snapshot - the same Clean/Dirty cycle a host
//! build tool drives through repeated emit events.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant, SystemTime};

use anyhow::{Context as _, Result};
use notify::{Event, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;

use super::build::{persist_snapshot, session_snapshot};
use crate::config::{Config, cfg, reload_config};
use crate::core::{self, BuildMode};
use crate::freshness::Snapshot;
use crate::pass::{self, PassOutcome, PassReport};
use crate::utils::plural_count;
use crate::{debug, log, logger};

/// Poll interval for the debounce loop
const POLL_MS: u64 = 50;

/// Debounce state for pending file events
struct WatcherState {
    pending: FxHashSet<PathBuf>,
    config_changed: bool,
    last_event: Option<Instant>,
}

impl WatcherState {
    fn new() -> Self {
        Self {
            pending: FxHashSet::default(),
            config_changed: false,
            last_event: None,
        }
    }

    fn record(&mut self, path: PathBuf) {
        self.pending.insert(path);
        self.last_event = Some(Instant::now());
    }

    fn record_config(&mut self) {
        self.config_changed = true;
        self.last_event = Some(Instant::now());
    }

    fn should_rebuild(&self, debounce: Duration) -> bool {
        self.last_event.is_some_and(|t| t.elapsed() >= debounce)
            && (!self.pending.is_empty() || self.config_changed)
    }

    fn take(&mut self) -> (usize, bool) {
        let changes = self.pending.len();
        self.pending.clear();
        let config_changed = std::mem::take(&mut self.config_changed);
        self.last_event = None;
        (changes, config_changed)
    }
}

/// Run the watch loop until Ctrl+C.
pub fn run_watch() -> Result<()> {
    let config = cfg();
    logger::set_verbose(config.verbose);
    core::set_watch_active();

    let started_at = SystemTime::now();
    let mut snapshot = session_snapshot(&config, BuildMode::WATCH, started_at);

    // Initial pass: empty snapshot, always rebuilds
    let result = pass::run_pass(&config, BuildMode::WATCH, &mut snapshot);
    report_pass(result, &config, &snapshot);

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })
    .context("failed to create file watcher")?;

    for root in watch_roots(&config) {
        watcher
            .watch(&root, RecursiveMode::Recursive)
            .with_context(|| format!("failed to watch {}", root.display()))?;
    }
    // Project root, non-recursive: catches config file edits
    watcher
        .watch(&config.root, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {}", config.root.display()))?;

    log!("watch"; "watching {}", plural_count(config.sprite.files.len(), "input"));

    let mut state = WatcherState::new();
    while !core::is_shutdown() {
        match rx.recv_timeout(Duration::from_millis(POLL_MS)) {
            Ok(event) => route_event(event, &mut state),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }

        let debounce = Duration::from_millis(cfg().watch.debounce_ms);
        if state.should_rebuild(debounce) {
            let (changes, config_changed) = state.take();

            if config_changed {
                match reload_config() {
                    Ok(true) => {
                        logger::status_success("config reloaded");
                        // Template or inputs may have changed shape
                        snapshot.invalidate();
                    }
                    Ok(false) => {}
                    Err(e) => {
                        logger::status_error("config reload failed", &format!("{e:#}"));
                        continue;
                    }
                }
            }

            debug!("watch"; "{} changed", plural_count(changes, "path"));
            let config = cfg();
            let result = pass::run_pass(&config, BuildMode::WATCH, &mut snapshot);
            report_pass(result, &config, &snapshot);
        }
    }

    Ok(())
}

/// Report a watch pass through the status line and persist the snapshot.
fn report_pass(result: Result<PassReport>, config: &Config, snapshot: &Snapshot) {
    match result {
        Ok(report) => {
            match &report.outcome {
                PassOutcome::Rebuilt { file_name } => {
                    logger::status_success(&format!("rebuilt {file_name}"));
                }
                PassOutcome::Skipped => {
                    logger::status_unchanged("no watched input changed");
                }
            }
            persist_snapshot(snapshot, config);
        }
        Err(e) => logger::status_error("build failed", &format!("{e:#}")),
    }
}

/// Route a watcher event into the debounce state.
fn route_event(event: Event, state: &mut WatcherState) {
    let config = cfg();
    for path in event.paths {
        if path == config.config_path {
            state.record_config();
        } else if is_watched(&path, &config) {
            state.record(path);
        }
    }
}

/// Check whether a changed path belongs to the configured inputs.
fn is_watched(path: &Path, config: &Config) -> bool {
    config
        .sprite
        .files
        .iter()
        .any(|entry| path == entry || path.starts_with(entry))
}

/// Directories to watch: each directory entry itself, each file's parent.
fn watch_roots(config: &Config) -> Vec<PathBuf> {
    let mut roots = FxHashSet::default();
    for entry in &config.sprite.files {
        if entry.is_dir() {
            roots.insert(entry.clone());
        } else if let Some(parent) = entry.parent() {
            roots.insert(parent.to_path_buf());
        }
    }
    let mut roots: Vec<_> = roots.into_iter().collect();
    roots.sort();
    roots
}
