//! Build-pass phases.
//!
//! The lifecycle callbacks of a host build tool are expressed here as an
//! explicit phase interface: each [`Phase`] runs once per build pass
//! against a [`PassContext`] it can read and mutate, and the context
//! never outlives the pass. Phase order is fixed by the driver:
//!
//! - [`EmitPhase`] - dirty-check, aggregate, resolve the filename,
//!   optimize, register the sprite asset
//! - [`HtmlDataPhase`] - expose the raw document to the HTML-generation
//!   companion step

mod context;
mod emit;
mod html;
#[cfg(test)]
mod tests;

pub use context::{AssetRegistry, EmittedAsset, HtmlData, PassContext, PassOutcome};
pub use emit::EmitPhase;
pub use html::{HTML_DATA_KEY, HtmlDataPhase, MANIFEST_FILE, write_manifest};

use anyhow::{Context as _, Result};
use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::core::BuildMode;
use crate::freshness::Snapshot;

/// A step that runs once per build pass.
///
/// Phases declare dependencies on the context and read/mutate the shared
/// pass state through it.
pub trait Phase {
    /// Phase name for error attribution.
    fn name(&self) -> &'static str;

    /// Run the phase against the pass context.
    fn run(&mut self, ctx: &mut PassContext) -> Result<()>;
}

/// Result of one build pass.
#[derive(Debug)]
pub struct PassReport {
    pub outcome: PassOutcome,
    /// Files written to the output directory this pass.
    pub written: Vec<PathBuf>,
}

/// Run one build pass: the phases in order, then flush to disk.
///
/// A skipped pass writes nothing; the previously emitted sprite and
/// manifest stay valid on disk.
pub fn run_pass(config: &Config, mode: BuildMode, snapshot: &mut Snapshot) -> Result<PassReport> {
    let mut ctx = PassContext::new(config, mode);

    let mut phases: Vec<Box<dyn Phase + '_>> =
        vec![Box::new(EmitPhase::new(snapshot)), Box::new(HtmlDataPhase)];
    for phase in &mut phases {
        let name = phase.name();
        phase
            .run(&mut ctx)
            .with_context(|| format!("{name} phase failed"))?;
    }

    let mut written = Vec::new();
    if matches!(ctx.outcome, PassOutcome::Rebuilt { .. }) {
        let output_dir = config.output_dir();
        fs::create_dir_all(output_dir)
            .with_context(|| format!("failed to create output dir {}", output_dir.display()))?;
        written.extend(ctx.assets.flush(output_dir)?);
        if config.build.manifest && !ctx.html.is_empty() {
            written.push(write_manifest(&ctx.html, output_dir)?);
        }
    }

    Ok(PassReport {
        outcome: ctx.outcome,
        written,
    })
}
