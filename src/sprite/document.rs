//! Sprite document assembly.
//!
//! The emitted document is a fixed SVG 1.1 shell around the concatenated
//! fragment bodies: XML declaration, DOCTYPE, and a namespaced root
//! element. Consumers referencing symbols via `xlink:href` rely on the
//! xlink namespace being declared on the root.

/// XML declaration line.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// SVG 1.1 DOCTYPE line.
pub const SVG_DOCTYPE: &str = r#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">"#;

/// Root element open tag with namespace declarations.
const SVG_ROOT_OPEN: &str =
    r#"<svg version="1.1" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">"#;

/// Root element close tag.
const SVG_ROOT_CLOSE: &str = "</svg>";

/// Wrap concatenated fragment bodies in the sprite document shell.
pub fn wrap_document(fragments: &str) -> String {
    let mut doc = String::with_capacity(
        XML_DECLARATION.len()
            + SVG_DOCTYPE.len()
            + SVG_ROOT_OPEN.len()
            + fragments.len()
            + SVG_ROOT_CLOSE.len()
            + 4,
    );
    doc.push_str(XML_DECLARATION);
    doc.push('\n');
    doc.push_str(SVG_DOCTYPE);
    doc.push('\n');
    doc.push_str(SVG_ROOT_OPEN);
    doc.push('\n');
    doc.push_str(fragments);
    doc.push('\n');
    doc.push_str(SVG_ROOT_CLOSE);
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_document_shell() {
        let doc = wrap_document(r#"<path id="a"/><path id="b"/>"#);
        assert!(doc.starts_with(XML_DECLARATION));
        assert!(doc.contains(SVG_DOCTYPE));
        assert!(doc.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
        assert!(doc.contains(r#"xmlns:xlink="http://www.w3.org/1999/xlink""#));
        assert!(doc.ends_with("</svg>"));
    }

    #[test]
    fn test_wrap_document_keeps_fragment_order() {
        let doc = wrap_document(r#"<path id="a"/><path id="b"/>"#);
        let a = doc.find(r#"id="a""#).unwrap();
        let b = doc.find(r#"id="b""#).unwrap();
        assert!(a < b);
    }
}
