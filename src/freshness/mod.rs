//! Freshness detection: mtime snapshots of the watched input set.
//!
//! The decision is deliberately timestamp-based, not content-based: the
//! watched set is small and the question is "did anything move since the
//! last pass", not "is this output byte-identical". The content hash
//! lives in `sprite::fingerprint` and only names the output.

pub mod mtime;
mod snapshot;

pub use snapshot::{Snapshot, dependencies_changed};
