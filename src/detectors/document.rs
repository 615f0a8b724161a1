//! Document formats: PDF, RTF, PostScript and the OLE compound family.

use super::{hit, scan_magic, DetectorCategory, MagicTable, SignatureDetector};
use crate::detection::{utf16le_literal, ByteWindow, DetectionContext, MatchResult};

const OLE_HEADER: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Offset of the Visio stream name inside the first directory sector.
const VISIO_NAME_OFFSET: usize = 1664;
/// BIFF8 BOF record at the start of the workbook stream.
const XLS_BOF: &[u8] = &[0x09, 0x08, 0x10, 0x00, 0x00, 0x06, 0x05, 0x00];
const XLS_BOF_OFFSET: usize = 2048;
const XLS_SECTOR_MARKER: &[u8] = &[0xFD, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];
const XLS_SECTOR_OFFSET: usize = 512;

const LEADING: MagicTable = &[
    (0, b"%PDF", "pdf", "application/pdf"),
    (0, b"{\\rtf", "rtf", "application/rtf"),
    (60, b"BOOKMOBI", "mobi", "application/x-mobipocket-ebook"),
];

const TRAILING: MagicTable = &[
    (0, b"ITSF", "chm", "application/vnd.ms-htmlhelp"),
    (0, b"!BDN", "pst", "application/vnd.ms-outlook"),
    (
        0,
        &[
            0x06, 0x06, 0xED, 0xF5, 0xD8, 0x1D, 0x46, 0xE5, 0xBD, 0x31, 0xEF, 0xE7, 0xFE, 0x74,
            0xB7, 0x1D,
        ],
        "indd",
        "application/x-indesign",
    ),
];

/// Detects PDF, RTF, PostScript and OLE-based Office documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentSignatureDetector;

impl SignatureDetector for DocumentSignatureDetector {
    fn name(&self) -> &str {
        "document"
    }

    fn category(&self) -> DetectorCategory {
        DetectorCategory::Document
    }

    fn detect(&self, context: &DetectionContext) -> Option<MatchResult> {
        let w = context.window();

        if let Some(found) = scan_magic(w, LEADING) {
            return Some(found);
        }

        if is_eps(w) {
            return hit("eps", "application/eps");
        }
        if w.check_string("%!", 0) {
            return hit("ps", "application/postscript");
        }

        if w.check_for_bytes(OLE_HEADER, 0) {
            return Some(classify_ole(w));
        }

        scan_magic(w, TRAILING)
    }
}

/// DSC-conforming EPS text, or the binary DOS EPS header.
fn is_eps(w: &ByteWindow) -> bool {
    (w.check_string("%!", 0) && w.check_string("PS-Adobe-", 2) && w.check_string(" EPSF-", 14))
        || w.check_for_bytes(&[0xC5, 0xD0, 0xD3, 0xC6], 0)
}

/// Visio and Excel are told apart by fixed stream offsets; any other
/// compound file is reported as an installer package.
fn classify_ole(w: &ByteWindow) -> MatchResult {
    // "VisioDoc" in UTF-16LE without the high byte of the final code unit
    let visio = utf16le_literal("VisioDoc");
    if w.check_for_bytes(&visio[..visio.len() - 1], VISIO_NAME_OFFSET) {
        return MatchResult::new("vsd", "application/vnd.visio");
    }
    if w.check_for_bytes(XLS_BOF, XLS_BOF_OFFSET)
        || w.check_for_bytes(XLS_SECTOR_MARKER, XLS_SECTOR_OFFSET)
    {
        return MatchResult::new("xls", "application/vnd.ms-excel");
    }
    MatchResult::new("msi", "application/x-msi")
}
