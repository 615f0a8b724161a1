//! XML and markup text.
//!
//! The window is decoded one byte per char, stripped of a UTF-8 byte order
//! mark and leading ASCII whitespace, and lower-cased. Text that opens like
//! markup is then searched for the SVG, HTML, RDF and RSS root markers.
//! UTF-16 documents are recognised from their `<?xml` declaration only.

use super::{hit, DetectorCategory, SignatureDetector};
use crate::detection::{ByteWindow, DetectionContext, MatchResult};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Root markers in precedence order, matched against lower-cased text.
const FAMILIES: &[(&[&str], &str, &str)] = &[
    (&["<!doctype svg", "<svg"], "svg", "image/svg+xml"),
    (&["<!doctype html", "<html"], "html", "text/html"),
    (&["<rdf:rdf"], "rdf", "application/rdf+xml"),
    (&["<rss"], "rss", "application/rss+xml"),
];

/// Whitespace code units accepted after a UTF-16 `<?xml`.
const DECLARATION_SPACE: &[u8] = b" \t\r\n";

/// Detects XML documents and the markup families built on them.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlSignatureDetector;

impl SignatureDetector for XmlSignatureDetector {
    fn name(&self) -> &str {
        "xml"
    }

    fn category(&self) -> DetectorCategory {
        DetectorCategory::Text
    }

    fn detect(&self, context: &DetectionContext) -> Option<MatchResult> {
        let w = context.window();

        if let Some(found) = detect_markup(w) {
            return Some(found);
        }
        if has_utf16_declaration(w) {
            return hit("xml", "application/xml");
        }
        None
    }
}

/// Lower-cased window text with the BOM and leading whitespace removed.
pub fn normalized_text(w: &ByteWindow) -> String {
    let start = if w.check_for_bytes(UTF8_BOM, 0) {
        UTF8_BOM.len()
    } else {
        0
    };
    let text = w.slice_as_text(start, None);
    text.trim_matches(|c: char| c.is_ascii_whitespace())
        .to_ascii_lowercase()
}

/// Whether normalized text opens like an XML or SGML document.
pub fn looks_like_markup(text: &str) -> bool {
    let declaration = text
        .strip_prefix("<?xml")
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_whitespace()));
    if declaration || text.starts_with("<?xpacket") {
        return true;
    }
    let mut chars = text.chars();
    chars.next() == Some('<')
        && chars
            .next()
            .is_some_and(|c| matches!(c, '?' | '!' | '_' | ':') || c.is_ascii_alphabetic())
}

fn detect_markup(w: &ByteWindow) -> Option<MatchResult> {
    let text = normalized_text(w);
    if !looks_like_markup(&text) {
        return None;
    }
    FAMILIES
        .iter()
        .find(|(markers, _, _)| markers.iter().any(|m| text.contains(m)))
        .map_or_else(
            || hit("xml", "application/xml"),
            |(_, ext, mime)| hit(ext, mime),
        )
}

/// `<?xml` plus one whitespace code unit, in UTF-16 behind the matching BOM.
fn has_utf16_declaration(w: &ByteWindow) -> bool {
    let after = 2 + "<?xml".len() * 2;
    if w.check_for_bytes(UTF16LE_BOM, 0) && w.check_utf16le("<?xml", 2) {
        return DECLARATION_SPACE
            .iter()
            .any(|&c| w.check_for_bytes(&[c, 0x00], after));
    }
    if w.check_for_bytes(UTF16BE_BOM, 0) && w.check_utf16be("<?xml", 2) {
        return DECLARATION_SPACE
            .iter()
            .any(|&c| w.check_for_bytes(&[0x00, c], after));
    }
    false
}
