//! `[optimize]` section configuration.
//!
//! One explicit switch for the optimizer pass. There is deliberately no
//! environment-driven gating: whether the sprite is optimized is decided
//! here (or by the `--optimize` CLI flag) and nowhere else.
//!
//! # Example
//!
//! ```toml
//! [optimize]
//! enabled = true        # run the sprite through the SVG optimizer
//! dpi = 96.0            # unit-resolution DPI handed to the optimizer
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Field paths for diagnostics.
pub struct OptimizeFields {
    pub enabled: FieldPath,
    pub dpi: FieldPath,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeConfig {
    /// Pass the aggregated document through the SVG optimizer before
    /// emission. Optimizer failure falls back to the unoptimized
    /// document.
    pub enabled: bool,

    /// DPI used by the optimizer to resolve physical units.
    pub dpi: f32,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dpi: 96.0,
        }
    }
}

impl OptimizeConfig {
    pub const FIELDS: OptimizeFields = OptimizeFields {
        enabled: FieldPath::new("optimize.enabled"),
        dpi: FieldPath::new("optimize.dpi"),
    };

    /// Validate optimizer configuration.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.dpi <= 0.0 {
            diag.error_with_hint(
                Self::FIELDS.dpi,
                "dpi must be positive",
                "the default is 96.0",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.optimize, OptimizeConfig::default());
    }

    #[test]
    fn test_enabled_parsing() {
        let config = test_parse_config("[optimize]\nenabled = true\n");
        assert!(config.optimize.enabled);
    }

    #[test]
    fn test_nonpositive_dpi_rejected() {
        let config = test_parse_config("[optimize]\ndpi = 0.0\n");
        let mut diag = ConfigDiagnostics::new();
        config.optimize.validate(&mut diag);
        assert!(diag.has_errors());
    }
}
