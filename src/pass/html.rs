//! HTML-generation companion step.
//!
//! The raw aggregated document is exposed under a fixed namespaced key,
//! keyed again by the configured sprite name, and serialized as a JSON
//! manifest a downstream templating step can read to inline the sprite.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::{HtmlData, PassContext, Phase};

/// Namespaced key the sprite data lives under in the manifest.
pub const HTML_DATA_KEY: &str = "svgmux";

/// Manifest filename written next to the sprite.
pub const MANIFEST_FILE: &str = "sprite-data.json";

/// Injects the produced document into the HTML data bag.
///
/// Runs after the emit phase on every pass. A skipped pass injects
/// nothing; the manifest written by the last rebuilding pass stays valid
/// on disk.
pub struct HtmlDataPhase;

impl Phase for HtmlDataPhase {
    fn name(&self) -> &'static str {
        "html-data"
    }

    fn run(&mut self, ctx: &mut PassContext) -> Result<()> {
        if let Some(document) = &ctx.raw_document {
            ctx.html
                .sprites
                .insert(ctx.config.sprite.name.clone(), document.clone());
        }
        Ok(())
    }
}

/// Write the HTML data bag as `sprite-data.json` inside `dir`.
///
/// Layout: `{"svgmux": {"<sprite name>": "<raw document>"}}`.
pub fn write_manifest(html: &HtmlData, dir: &Path) -> Result<PathBuf> {
    let mut root = serde_json::Map::new();
    root.insert(
        HTML_DATA_KEY.to_string(),
        serde_json::to_value(&html.sprites)?,
    );

    let path = dir.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(&serde_json::Value::Object(root))?;
    fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
