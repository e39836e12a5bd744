//! Sprite optimization using usvg.
//!
//! Parses the assembled document and re-serializes it unindented, which
//! drops comments, metadata and editor cruft from the inputs. The caller
//! treats failure as non-fatal and falls back to the unoptimized
//! document.

use anyhow::{Context, Result};

/// Options for sprite optimization
#[derive(Debug, Clone)]
pub struct OptimizeOptions {
    /// DPI for physical unit resolution.
    pub dpi: f32,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self { dpi: 96.0 }
    }
}

/// Optimize the sprite document using usvg
///
/// Returns the re-serialized document on success; any parse failure is
/// an error so the caller can fall back to the unoptimized content.
pub fn optimize_sprite(content: &str, options: &OptimizeOptions) -> Result<String> {
    let usvg_options = usvg::Options {
        dpi: options.dpi,
        ..Default::default()
    };

    let tree = usvg::Tree::from_data(content.as_bytes(), &usvg_options)
        .context("failed to parse sprite document")?;

    let write_options = usvg::WriteOptions {
        indent: usvg::Indent::None,
        ..Default::default()
    };

    Ok(tree.to_string(&write_options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::wrap_document;

    #[test]
    fn test_optimize_drops_comments() {
        let doc = wrap_document(
            r#"<!-- editor cruft --><path id="a" d="M 0 0 L 10 10"/>"#,
        );
        let optimized = optimize_sprite(&doc, &OptimizeOptions::default()).unwrap();
        assert!(optimized.contains("<svg"));
        assert!(!optimized.contains("editor cruft"));
    }

    #[test]
    fn test_optimize_rejects_invalid_document() {
        let result = optimize_sprite("<svg><unclosed", &OptimizeOptions::default());
        assert!(result.is_err());
    }
}
