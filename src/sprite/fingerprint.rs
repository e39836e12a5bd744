//! Content fingerprint and filename template resolution.
//!
//! The fingerprint is a blake3 hex digest of the concatenated input
//! contents in configuration order. Same inputs and same template always
//! resolve to the same output name, across runs and across processes -
//! the name is pure cache-busting, no clock or randomness involved.

/// Template token substituted with the configured sprite name.
pub const NAME_TOKEN: &str = "[name]";

/// Template token substituted with the fingerprint segment.
pub const HASH_TOKEN: &str = "[hash]";

/// Length of the fingerprint segment used in filenames.
pub const HASH_SEGMENT_LEN: usize = 20;

/// Compute the content fingerprint (blake3, lowercase hex).
pub fn fingerprint(content: &str) -> String {
    hex::encode(blake3::hash(content.as_bytes()).as_bytes())
}

/// Resolve the output filename from a template.
///
/// When hashing is requested (flag or `[hash]` token already present):
/// a template lacking the token gets `.[hash]` inserted before a
/// trailing `.svg` extension (a template without that extension is left
/// untouched), then the token is replaced with the first
/// [`HASH_SEGMENT_LEN`] characters of the fingerprint. The `[name]`
/// token is substituted last.
///
/// The fingerprint closure is only invoked when a hash is actually
/// needed, so a hashless template never pays for hashing.
pub fn resolve_file_name<F>(template: &str, name: &str, use_hash: bool, fingerprint: F) -> String
where
    F: FnOnce() -> String,
{
    let mut file_name = template.to_string();

    if use_hash || file_name.contains(HASH_TOKEN) {
        if !file_name.contains(HASH_TOKEN)
            && let Some(stem) = file_name.strip_suffix(".svg")
        {
            file_name = format!("{stem}.{HASH_TOKEN}.svg");
        }

        if file_name.contains(HASH_TOKEN) {
            let digest = fingerprint();
            let segment = &digest[..HASH_SEGMENT_LEN.min(digest.len())];
            file_name = file_name.replace(HASH_TOKEN, segment);
        }
    }

    file_name.replace(NAME_TOKEN, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_deterministic() {
        let a = fingerprint("<path id=\"a\"/><path id=\"b\"/>");
        let b = fingerprint("<path id=\"a\"/><path id=\"b\"/>");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_order_sensitive() {
        assert_ne!(fingerprint("ab"), fingerprint("ba"));
    }

    #[test]
    fn test_resolve_with_tokens() {
        let name = resolve_file_name("[name].[hash].svg", "icons", true, || {
            fingerprint("content")
        });
        assert!(name.starts_with("icons."));
        assert!(name.ends_with(".svg"));

        let segment = name
            .trim_start_matches("icons.")
            .trim_end_matches(".svg");
        assert_eq!(segment.len(), HASH_SEGMENT_LEN);
        assert!(segment.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_resolve_hash_token_without_flag() {
        // An explicit [hash] token hashes even when use_hash is off
        let name = resolve_file_name("sprite.[hash].svg", "icons", false, || {
            fingerprint("content")
        });
        assert_ne!(name, "sprite.[hash].svg");
        assert!(!name.contains(HASH_TOKEN));
    }

    #[test]
    fn test_resolve_inserts_hash_before_svg_extension() {
        let digest = fingerprint("content");
        let name = resolve_file_name("[name].svg", "icons", true, || digest.clone());
        assert_eq!(name, format!("icons.{}.svg", &digest[..HASH_SEGMENT_LEN]));
    }

    #[test]
    fn test_resolve_no_extension_left_untouched() {
        // No [hash] token and no .svg suffix to insert one before
        let name = resolve_file_name("sprite.ico", "icons", true, || {
            panic!("fingerprint must not be computed")
        });
        assert_eq!(name, "sprite.ico");
    }

    #[test]
    fn test_resolve_without_hash_never_fingerprints() {
        let name = resolve_file_name("[name].svg", "icons", false, || {
            panic!("fingerprint must not be computed")
        });
        assert_eq!(name, "icons.svg");
    }

    #[test]
    fn test_resolve_stable_within_pass() {
        let digest = fingerprint("same content");
        let first = resolve_file_name("[name].[hash].svg", "icons", true, || digest.clone());
        let second = resolve_file_name("[name].[hash].svg", "icons", true, || digest.clone());
        assert_eq!(first, second);
    }
}
