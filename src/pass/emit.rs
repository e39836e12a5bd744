//! Emit phase: dirty-check, aggregation, filename resolution, optimizer.

use anyhow::Result;

use super::{EmittedAsset, PassContext, PassOutcome, Phase};
use crate::freshness::{Snapshot, mtime};
use crate::sprite::{self, OptimizeOptions};
use crate::{log, logger};

/// The build pass's main phase.
///
/// Declares the configured inputs as dependencies, runs the dirty-check
/// against the session snapshot, and on a dirty pass aggregates the
/// inputs, resolves the output filename, optionally optimizes, and
/// registers the sprite in the asset table.
///
/// The snapshot is updated on every run, so a dirty pass returns to
/// clean regardless of whether the emit path succeeded.
pub struct EmitPhase<'s> {
    snapshot: &'s mut Snapshot,
}

impl<'s> EmitPhase<'s> {
    pub fn new(snapshot: &'s mut Snapshot) -> Self {
        Self { snapshot }
    }
}

impl Phase for EmitPhase<'_> {
    fn name(&self) -> &'static str {
        "emit"
    }

    fn run(&mut self, ctx: &mut PassContext) -> Result<()> {
        let sprite_cfg = &ctx.config.sprite;

        // Declare inputs as dependencies of this pass
        let inputs = sprite::expand_inputs(&sprite_cfg.files);
        ctx.dependencies.extend(inputs.iter().cloned());

        // Dirty-check against the previous snapshot
        ctx.timestamps = mtime::collect_timestamps(&inputs);
        let changed = self.snapshot.check_and_update(&ctx.timestamps, &ctx.dependencies);
        if !changed {
            ctx.outcome = PassOutcome::Skipped;
            return Ok(());
        }

        // Aggregate in configuration order
        let files = sprite::read_inputs(&inputs)?;
        let fragments = sprite::concat_contents(&files);
        let document = sprite::wrap_document(&fragments);

        // Resolve the output name (fingerprint over the raw aggregate)
        let file_name = sprite::resolve_file_name(
            &sprite_cfg.file_name,
            &sprite_cfg.name,
            sprite_cfg.use_hash,
            || ctx.fingerprint(&fragments).to_string(),
        );

        // Optimize, falling back to the unoptimized document on failure
        let payload = if ctx.config.optimize.enabled {
            let options = OptimizeOptions {
                dpi: ctx.config.optimize.dpi,
            };
            match sprite::optimize_sprite(&document, &options) {
                Ok(optimized) => optimized,
                Err(err) => {
                    let message =
                        format!("optimizer failed, emitting unoptimized sprite: {err:#}");
                    if ctx.mode.is_watch() {
                        logger::status_warning(&message);
                    } else {
                        log!("warning"; "{message}");
                    }
                    document.clone()
                }
            }
        } else {
            document.clone()
        };

        ctx.assets
            .insert(EmittedAsset::new(file_name.clone(), payload.into_bytes()));
        ctx.raw_document = Some(document);
        self.snapshot.set_emitted(file_name.clone());
        ctx.outcome = PassOutcome::Rebuilt { file_name };

        Ok(())
    }
}
