//! Sprite assembly: input aggregation, document wrapping, content
//! fingerprinting, and the optional optimizer pass.

mod aggregate;
mod document;
mod fingerprint;
mod optimize;

pub use aggregate::{SpriteError, concat_contents, expand_inputs, read_inputs};
pub use document::wrap_document;
pub use fingerprint::{HASH_SEGMENT_LEN, HASH_TOKEN, NAME_TOKEN, fingerprint, resolve_file_name};
pub use optimize::{OptimizeOptions, optimize_sprite};
