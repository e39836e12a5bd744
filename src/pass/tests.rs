//! Integration-style tests for complete build passes.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rustc_hash::{FxHashMap, FxHashSet};
use tempfile::TempDir;

use super::{HTML_DATA_KEY, MANIFEST_FILE, PassOutcome, run_pass};
use crate::config::Config;
use crate::core::BuildMode;
use crate::freshness::Snapshot;
use crate::sprite::HASH_SEGMENT_LEN;

fn test_config(root: &Path, files: Vec<PathBuf>, file_name: &str, use_hash: bool) -> Config {
    let mut config = Config::default();
    config.root = root.to_path_buf();
    config.config_path = root.join("svgmux.toml");
    config.sprite.name = "sprite".to_string();
    config.sprite.file_name = file_name.to_string();
    config.sprite.use_hash = use_hash;
    config.sprite.files = files;
    config.build.output = root.join("dist");
    config
}

fn write_inputs(root: &Path) -> (PathBuf, PathBuf) {
    let a = root.join("a.svg");
    let b = root.join("b.svg");
    fs::write(&a, r#"<path id="a"/>"#).unwrap();
    fs::write(&b, r#"<path id="b"/>"#).unwrap();
    (a, b)
}

#[test]
fn test_first_pass_emits_hashed_sprite() {
    let dir = TempDir::new().unwrap();
    let (a, b) = write_inputs(dir.path());
    let config = test_config(dir.path(), vec![a, b], "sprite.[hash].svg", true);

    let mut snapshot = Snapshot::new(SystemTime::now());
    let report = run_pass(&config, BuildMode::ONESHOT, &mut snapshot).unwrap();

    let PassOutcome::Rebuilt { file_name } = &report.outcome else {
        panic!("first pass must rebuild");
    };

    // sprite.<20 hex chars>.svg
    let segment = file_name
        .strip_prefix("sprite.")
        .and_then(|rest| rest.strip_suffix(".svg"))
        .expect("name should match the template");
    assert_eq!(segment.len(), HASH_SEGMENT_LEN);
    assert!(segment.chars().all(|c| c.is_ascii_hexdigit()));

    // Both fragments inside one <svg> root, a before b
    let payload = fs::read_to_string(config.output_dir().join(file_name)).unwrap();
    assert!(payload.contains(r#"<svg version="1.1""#));
    let pa = payload.find(r#"id="a""#).unwrap();
    let pb = payload.find(r#"id="b""#).unwrap();
    assert!(pa < pb);
}

#[test]
fn test_unchanged_second_pass_skips() {
    let dir = TempDir::new().unwrap();
    let (a, b) = write_inputs(dir.path());
    let config = test_config(dir.path(), vec![a, b], "[name].svg", false);

    let mut snapshot = Snapshot::new(SystemTime::now());
    let first = run_pass(&config, BuildMode::ONESHOT, &mut snapshot).unwrap();
    assert!(matches!(first.outcome, PassOutcome::Rebuilt { .. }));

    let second = run_pass(&config, BuildMode::ONESHOT, &mut snapshot).unwrap();
    assert_eq!(second.outcome, PassOutcome::Skipped);
    assert!(second.written.is_empty());
}

#[test]
fn test_stale_snapshot_triggers_rebuild() {
    let dir = TempDir::new().unwrap();
    let (a, b) = write_inputs(dir.path());
    let config = test_config(dir.path(), vec![a.clone(), b.clone()], "[name].svg", false);

    // Seed the snapshot with timestamps far older than the real files
    let mut snapshot = Snapshot::new(UNIX_EPOCH);
    let watched: FxHashSet<PathBuf> = [a, b].into_iter().collect();
    let stale: FxHashMap<PathBuf, SystemTime> = watched
        .iter()
        .map(|p| (p.clone(), UNIX_EPOCH + Duration::from_secs(1)))
        .collect();
    snapshot.check_and_update(&stale, &watched);

    let report = run_pass(&config, BuildMode::ONESHOT, &mut snapshot).unwrap();
    assert!(matches!(report.outcome, PassOutcome::Rebuilt { .. }));
}

#[test]
fn test_name_deterministic_across_sessions() {
    let dir_one = TempDir::new().unwrap();
    let dir_two = TempDir::new().unwrap();

    let name_in = |root: &Path| {
        let (a, b) = write_inputs(root);
        let config = test_config(root, vec![a, b], "[name].[hash].svg", true);
        let mut snapshot = Snapshot::new(SystemTime::now());
        match run_pass(&config, BuildMode::ONESHOT, &mut snapshot)
            .unwrap()
            .outcome
        {
            PassOutcome::Rebuilt { file_name } => file_name,
            PassOutcome::Skipped => panic!("first pass must rebuild"),
        }
    };

    // Identical contents and order resolve to the identical name,
    // independent of location or process lifetime
    assert_eq!(name_in(dir_one.path()), name_in(dir_two.path()));
}

#[test]
fn test_manifest_written_under_namespaced_key() {
    let dir = TempDir::new().unwrap();
    let (a, b) = write_inputs(dir.path());
    let config = test_config(dir.path(), vec![a, b], "[name].svg", false);

    let mut snapshot = Snapshot::new(SystemTime::now());
    run_pass(&config, BuildMode::ONESHOT, &mut snapshot).unwrap();

    let raw = fs::read_to_string(config.output_dir().join(MANIFEST_FILE)).unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let document = manifest[HTML_DATA_KEY]["sprite"]
        .as_str()
        .expect("manifest should key the document by sprite name");
    assert!(document.starts_with("<?xml"));
    assert!(document.contains(r#"id="a""#));
    assert!(document.contains(r#"id="b""#));
}

#[test]
fn test_manifest_disabled() {
    let dir = TempDir::new().unwrap();
    let (a, b) = write_inputs(dir.path());
    let mut config = test_config(dir.path(), vec![a, b], "[name].svg", false);
    config.build.manifest = false;

    let mut snapshot = Snapshot::new(SystemTime::now());
    run_pass(&config, BuildMode::ONESHOT, &mut snapshot).unwrap();

    assert!(!config.output_dir().join(MANIFEST_FILE).exists());
}

#[test]
fn test_unreadable_input_fails_pass() {
    let dir = TempDir::new().unwrap();
    let (a, _) = write_inputs(dir.path());
    let missing = dir.path().join("missing.svg");
    let config = test_config(dir.path(), vec![a, missing], "[name].svg", false);

    let mut snapshot = Snapshot::new(SystemTime::now());
    let err = run_pass(&config, BuildMode::ONESHOT, &mut snapshot).unwrap_err();
    assert!(format!("{err:#}").contains("missing.svg"));
}

#[test]
fn test_optimizer_failure_falls_back_to_unoptimized() {
    let dir = TempDir::new().unwrap();
    let broken = dir.path().join("broken.svg");
    fs::write(&broken, "<path id=\"broken").unwrap();
    let mut config = test_config(dir.path(), vec![broken], "[name].svg", false);
    config.optimize.enabled = true;

    let mut snapshot = Snapshot::new(SystemTime::now());
    let report = run_pass(&config, BuildMode::ONESHOT, &mut snapshot).unwrap();

    // The asset must still be emitted, carrying the unoptimized document
    assert!(matches!(report.outcome, PassOutcome::Rebuilt { .. }));
    let payload = fs::read_to_string(config.output_dir().join("sprite.svg")).unwrap();
    assert!(payload.contains("<!DOCTYPE svg"));
    assert!(payload.contains(r#"id="broken"#));
}

#[test]
fn test_optimized_sprite_emitted() {
    let dir = TempDir::new().unwrap();
    let icon = dir.path().join("icon.svg");
    fs::write(&icon, r#"<!-- cruft --><path id="icon" d="M 0 0 L 4 4"/>"#).unwrap();
    let mut config = test_config(dir.path(), vec![icon], "[name].svg", false);
    config.optimize.enabled = true;

    let mut snapshot = Snapshot::new(SystemTime::now());
    run_pass(&config, BuildMode::ONESHOT, &mut snapshot).unwrap();

    let payload = fs::read_to_string(config.output_dir().join("sprite.svg")).unwrap();
    assert!(payload.contains("<svg"));
    assert!(!payload.contains("cruft"));
}

#[test]
fn test_literal_template_without_hash() {
    let dir = TempDir::new().unwrap();
    let (a, b) = write_inputs(dir.path());
    let config = test_config(dir.path(), vec![a, b], "icons.svg", false);

    let mut snapshot = Snapshot::new(SystemTime::now());
    let report = run_pass(&config, BuildMode::ONESHOT, &mut snapshot).unwrap();

    assert_eq!(
        report.outcome,
        PassOutcome::Rebuilt {
            file_name: "icons.svg".to_string()
        }
    );
    assert!(config.output_dir().join("icons.svg").exists());
}
