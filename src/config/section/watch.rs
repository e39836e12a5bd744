//! `[watch]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [watch]
//! debounce_ms = 100     # coalesce file events inside this window
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Field paths for diagnostics.
pub struct WatchFields {
    pub debounce_ms: FieldPath,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Debounce window for file events, in milliseconds. Events inside
    /// one window trigger a single rebuild.
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 100 }
    }
}

impl WatchConfig {
    pub const FIELDS: WatchFields = WatchFields {
        debounce_ms: FieldPath::new("watch.debounce_ms"),
    };

    /// Validate watch configuration.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.debounce_ms == 0 {
            diag.warn(
                Self::FIELDS.debounce_ms,
                "a zero debounce window rebuilds on every raw file event",
            );
        }
    }
}
