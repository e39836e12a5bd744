//! `[sprite]` section configuration.
//!
//! Sprite identity: output name, filename template, and the ordered
//! input list.
//!
//! # Example
//!
//! ```toml
//! [sprite]
//! name = "icons"                      # substituted for [name]
//! file_name = "[name].[hash].svg"     # filename template
//! use_hash = true                     # fingerprint in filename
//! files = [
//!     "icons/home.svg",               # single file
//!     "icons/social",                 # directory: all .svg files, sorted
//! ]
//! ```
//!
//! # Behavior
//!
//! - `files` order defines the byte layout of the final sprite.
//! - `use_hash = true` with a template lacking `[hash]` inserts the
//!   fingerprint before a trailing `.svg` extension.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::sprite::{HASH_TOKEN, NAME_TOKEN};

/// Field paths for diagnostics.
pub struct SpriteFields {
    pub name: FieldPath,
    pub file_name: FieldPath,
    pub use_hash: FieldPath,
    pub files: FieldPath,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    /// Name substituted for the `[name]` token.
    pub name: String,

    /// Output filename template. Supports `[name]` and `[hash]` tokens;
    /// a template without tokens is used as a literal filename.
    pub file_name: String,

    /// Insert the content fingerprint into the filename even when the
    /// template carries no `[hash]` token.
    pub use_hash: bool,

    /// Ordered list of inputs. Order determines the sprite's byte
    /// layout. Directory entries expand to the `.svg` files below them
    /// in sorted order.
    pub files: Vec<PathBuf>,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            name: "svg-sprite".to_string(),
            file_name: "[name].[hash].svg".to_string(),
            use_hash: false,
            files: Vec::new(),
        }
    }
}

impl SpriteConfig {
    pub const FIELDS: SpriteFields = SpriteFields {
        name: FieldPath::new("sprite.name"),
        file_name: FieldPath::new("sprite.file_name"),
        use_hash: FieldPath::new("sprite.use_hash"),
        files: FieldPath::new("sprite.files"),
    };

    /// Validate sprite configuration.
    ///
    /// # Checks
    /// - `name` must not be empty (it keys the HTML-data side channel).
    /// - `files` must list at least one existing input.
    /// - A `use_hash` template must offer somewhere to put the hash.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.name.is_empty() {
            diag.error(Self::FIELDS.name, "sprite name must not be empty");
        }

        if self.file_name.is_empty() {
            diag.error_with_hint(
                Self::FIELDS.file_name,
                "filename template must not be empty",
                format!("the default is \"{NAME_TOKEN}.{HASH_TOKEN}.svg\""),
            );
        }

        if self.files.is_empty() {
            diag.error_with_hint(
                Self::FIELDS.files,
                "at least one input file is required",
                "add files = [\"icons/home.svg\"]",
            );
        }

        for file in &self.files {
            if !file.exists() {
                diag.error(
                    Self::FIELDS.files,
                    format!("input does not exist: {}", file.display()),
                );
            }
        }

        if self.use_hash
            && !self.file_name.contains(HASH_TOKEN)
            && !self.file_name.ends_with(".svg")
        {
            diag.warn(
                Self::FIELDS.file_name,
                format!(
                    "template has no `{HASH_TOKEN}` token and no `.svg` suffix to insert one before; the fingerprint will not appear in the filename"
                ),
            );
        }
    }
}
