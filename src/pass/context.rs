//! Per-build-pass state.
//!
//! Everything a pass touches lives here and is passed by reference into
//! each phase - there is no implicit global build state. The context is
//! constructed fresh for every pass; only the timestamp snapshot
//! (owned by the driver) survives between passes.

use std::cell::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context as _, Result};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::Config;
use crate::core::BuildMode;
use crate::sprite;

/// An emitted asset: output filename plus byte payload.
///
/// Mirrors the asset-table contract of host build tools: `source()` for
/// the bytes, `size()` for the length.
#[derive(Debug, Clone)]
pub struct EmittedAsset {
    name: String,
    payload: Vec<u8>,
}

impl EmittedAsset {
    pub fn new(name: String, payload: Vec<u8>) -> Self {
        Self { name, payload }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn source(&self) -> &[u8] {
        &self.payload
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.payload.len()
    }
}

/// Asset table for one build pass: output filename -> payload.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    entries: Vec<EmittedAsset>,
}

impl AssetRegistry {
    /// Register an asset, replacing any previous entry with the same name.
    pub fn insert(&mut self, asset: EmittedAsset) {
        self.entries.retain(|e| e.name != asset.name);
        self.entries.push(asset);
    }

    pub fn get(&self, name: &str) -> Option<&EmittedAsset> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write all registered assets into `dir`, returning the paths written.
    pub fn flush(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.entries.len());
        for asset in &self.entries {
            let path = dir.join(asset.name());
            fs::write(&path, asset.source())
                .with_context(|| format!("failed to write {}", path.display()))?;
            written.push(path);
        }
        Ok(written)
    }
}

/// Data bag handed to the HTML-generation companion step.
///
/// Sprite name -> raw (pre-optimizer) sprite document.
#[derive(Debug, Default)]
pub struct HtmlData {
    pub sprites: FxHashMap<String, String>,
}

impl HtmlData {
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

/// Outcome of the emit phase for one pass.
///
/// A pass is Clean (skipped) unless the dirty-check saw a changed input;
/// a Dirty pass always returns to Clean once the snapshot is updated,
/// whatever happened on the emit path afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PassOutcome {
    /// No watched input changed; nothing was recomputed.
    #[default]
    Skipped,
    /// The sprite was rebuilt and registered under this filename.
    Rebuilt { file_name: String },
}

/// Per-build-pass state passed by mutable reference into each phase.
pub struct PassContext<'a> {
    /// Frozen configuration for this pass.
    pub config: &'a Config,

    /// Mode of the session driving this pass.
    pub mode: BuildMode,

    /// Current mtimes of the watched inputs (partial map).
    pub timestamps: FxHashMap<PathBuf, SystemTime>,

    /// Inputs declared as dependencies of this pass.
    pub dependencies: FxHashSet<PathBuf>,

    /// Asset table filled by the emit phase.
    pub assets: AssetRegistry,

    /// Data bag for the HTML-generation companion step.
    pub html: HtmlData,

    /// Raw wrapped document produced this pass (pre-optimizer).
    pub raw_document: Option<String>,

    /// Emit outcome of this pass.
    pub outcome: PassOutcome,

    /// Content fingerprint, computed at most once per pass.
    fingerprint: OnceCell<String>,
}

impl<'a> PassContext<'a> {
    pub fn new(config: &'a Config, mode: BuildMode) -> Self {
        Self {
            config,
            mode,
            timestamps: FxHashMap::default(),
            dependencies: FxHashSet::default(),
            assets: AssetRegistry::default(),
            html: HtmlData::default(),
            raw_document: None,
            outcome: PassOutcome::default(),
            fingerprint: OnceCell::new(),
        }
    }

    /// Fingerprint of this pass's aggregate content.
    ///
    /// Computed on first use and reused for the rest of the pass.
    pub fn fingerprint(&self, content: &str) -> &str {
        self.fingerprint
            .get_or_init(|| sprite::fingerprint(content))
    }
}
