//! Cheap content hashing using FxHash.
//!
//! Uses `rustc_hash::FxHasher` for fast, deterministic 64-bit hashes of
//! small in-memory data. This is NOT the sprite fingerprint (that one is
//! blake3, see `sprite::fingerprint`) - it is only used to detect whether
//! the config file content changed between reloads.

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Compute 64-bit hash from byte data.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(data.as_ref());
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_deterministic() {
        assert_eq!(compute("same content"), compute("same content"));
        assert_ne!(compute("one"), compute("two"));
    }
}
