//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! output = "dist"       # output directory (relative to project root)
//! manifest = true       # write sprite-data.json next to the sprite
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::{ConfigDiagnostics, FieldPath};

/// Field paths for diagnostics.
pub struct BuildFields {
    pub output: FieldPath,
    pub manifest: FieldPath,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Output directory for the emitted sprite and manifest.
    pub output: PathBuf,

    /// Write the HTML-data manifest (`sprite-data.json`) alongside the
    /// sprite so a templating step can inline the document.
    pub manifest: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("dist"),
            manifest: true,
        }
    }
}

impl BuildConfig {
    pub const FIELDS: BuildFields = BuildFields {
        output: FieldPath::new("build.output"),
        manifest: FieldPath::new("build.manifest"),
    };

    /// Validate build configuration.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.output.as_os_str().is_empty() {
            diag.error(Self::FIELDS.output, "output directory must not be empty");
        }
    }
}
