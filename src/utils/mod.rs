//! Small shared utilities.
//!
//! - [`hash`]: FxHash content hashing (config reload detection)
//! - [`path`]: filesystem path normalization
//! - [`plural`]: log message pluralization

pub mod hash;
pub mod path;
mod plural;

pub use plural::{plural_count, plural_s};
