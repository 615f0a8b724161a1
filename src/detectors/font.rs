//! Font containers and Windows icon resources.

use super::{hit, scan_magic, DetectorCategory, MagicTable, SignatureDetector};
use crate::detection::{ByteWindow, DetectionContext, MatchResult};

/// EOT version fields at offset 8 accepted alongside the `LP` magic.
const EOT_VERSIONS: &[&[u8]] = &[&[0x00, 0x00, 0x01], &[0x01, 0x00, 0x02], &[0x02, 0x00, 0x02]];

const SFNT_AND_ICONS: MagicTable = &[
    (0, b"ttcf", "ttc", "font/collection"),
    (0, &[0x00, 0x01, 0x00, 0x00, 0x00], "ttf", "font/ttf"),
    (0, b"OTTO\x00", "otf", "font/otf"),
    (0, &[0x00, 0x00, 0x01, 0x00], "ico", "image/x-icon"),
    (0, &[0x00, 0x00, 0x02, 0x00], "cur", "image/x-icon"),
];

/// Detects WOFF, EOT, TrueType/OpenType fonts and icon resources.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontSignatureDetector;

impl SignatureDetector for FontSignatureDetector {
    fn name(&self) -> &str {
        "font"
    }

    fn category(&self) -> DetectorCategory {
        DetectorCategory::Font
    }

    fn detect(&self, context: &DetectionContext) -> Option<MatchResult> {
        let w = context.window();

        if let Some(found) = detect_woff(w) {
            return Some(found);
        }

        if w.check_string("LP", 34) && EOT_VERSIONS.iter().any(|v| w.check_for_bytes(v, 8)) {
            return hit("eot", "application/vnd.ms-fontobject");
        }

        scan_magic(w, SFNT_AND_ICONS)
    }
}

/// `wOF` + version byte, wrapping either a TrueType or CFF flavour.
fn detect_woff(w: &ByteWindow) -> Option<MatchResult> {
    if !w.check_string("wOF", 0) {
        return None;
    }
    if !(w.check_for_bytes(&[0x00, 0x01, 0x00, 0x00], 4) || w.check_string("OTTO", 4)) {
        return None;
    }
    match w.get(3)? {
        b'F' => hit("woff", "font/woff"),
        b'2' => hit("woff2", "font/woff2"),
        _ => None,
    }
}
