//! Raster and camera-raw image formats.

use super::{hit, scan_magic, DetectorCategory, MagicTable, SignatureDetector};
use crate::detection::{ByteWindow, DetectionContext, MatchResult};

const TIFF_LE: &[u8] = b"II\x2A\x00";
const TIFF_BE: &[u8] = b"MM\x00\x2A";

const JPEG2000_HEADER: &[u8] = &[
    0x00, 0x00, 0x00, 0x0C, b'j', b'P', b' ', b' ', 0x0D, 0x0A, 0x87, 0x0A,
];
const JXL_CONTAINER: &[u8] = &[
    0x00, 0x00, 0x00, 0x0C, b'J', b'X', b'L', b' ', 0x0D, 0x0A, 0x87, 0x0A,
];

/// Checked before the TIFF family.
const LEADING: MagicTable = &[
    (0, &[0xFF, 0xD8, 0xFF], "jpg", "image/jpeg"),
    (0, &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A], "png", "image/png"),
    (0, b"GIF", "gif", "image/gif"),
    (8, b"WEBP", "webp", "image/webp"),
    (0, b"icns", "icns", "image/icns"),
    (0, b"FLIF", "flif", "image/flif"),
];

const MIDDLE: MagicTable = &[
    (0, b"BM", "bmp", "image/bmp"),
    (0, &[0x49, 0x49, 0xBC], "jxr", "image/vnd.ms-photo"),
    (0, b"8BPS", "psd", "image/vnd.adobe.photoshop"),
    (0, &[0x42, 0x50, 0x47, 0xFB], "bpg", "image/bpg"),
    (0, &[0xFF, 0x0A], "jxl", "image/jxl"),
    (0, JXL_CONTAINER, "jxl", "image/jxl"),
];

/// JPEG 2000 family, keyed by the brand at offset 20.
const JPEG2000_BRANDS: MagicTable = &[
    (20, b"jp2 ", "jp2", "image/jp2"),
    (20, b"jpx ", "jpx", "image/jpx"),
    (20, b"jpm ", "jpm", "image/jpm"),
    (20, b"mjp2", "mj2", "image/mj2"),
];

/// Still-image ISO-BMFF brands at offset 8.
const HEIF_BRANDS: MagicTable = &[
    (8, b"mif1", "heic", "image/heif"),
    (8, b"msf1", "heic", "image/heif-sequence"),
    (8, b"heic", "heic", "image/heic"),
    (8, b"heix", "heic", "image/heic"),
    (8, b"hevc", "heic", "image/heic-sequence"),
    (8, b"hevx", "heic", "image/heic-sequence"),
    (8, b"avif", "avif", "image/avif"),
    (8, b"avis", "avif", "image/avif"),
    (8, b"crx ", "cr3", "image/x-canon-cr3"),
];

const TRAILING: MagicTable = &[
    (
        0,
        &[0xAB, b'K', b'T', b'X', b' ', b'1', b'1', 0xBB, 0x0D, 0x0A, 0x1A, 0x0A],
        "ktx",
        "image/ktx",
    ),
    (128, b"DICM", "dcm", "application/dicom"),
    (0, &[0xFF, 0x4F, 0xFF, 0x51], "j2c", "image/j2c"),
    (0, &[b'I', b'I', b'R', b'O', 0x08, 0x00, 0x00, 0x00, 0x18], "orf", "image/x-olympus-orf"),
    (0, b"FUJIFILMCCD-RAW", "raf", "image/x-fujifilm-raf"),
    (
        0,
        &[0x49, 0x49, 0x55, 0x00, 0x18, 0x00, 0x00, 0x00, 0x88, 0xE7, 0x74, 0xD8],
        "rw2",
        "image/x-panasonic-rw2",
    ),
    (0, b"gimp xcf ", "xcf", "image/x-xcf"),
];

/// Detects image formats, including the HEIF/AVIF `ftyp` brands.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageSignatureDetector;

impl SignatureDetector for ImageSignatureDetector {
    fn name(&self) -> &str {
        "image"
    }

    fn category(&self) -> DetectorCategory {
        DetectorCategory::Image
    }

    fn detect(&self, context: &DetectionContext) -> Option<MatchResult> {
        let w = context.window();

        if let Some(found) = scan_magic(w, LEADING) {
            return Some(found);
        }

        if is_tiff(w) {
            // Canon CR2 is TIFF with "CR" right after the IFD offset
            if w.check_string("CR", 8) {
                return hit("cr2", "image/x-canon-cr2");
            }
            return hit("tif", "image/tiff");
        }

        if let Some(found) = scan_magic(w, MIDDLE) {
            return Some(found);
        }

        if w.check_for_bytes(JPEG2000_HEADER, 0) {
            if let Some(found) = scan_magic(w, JPEG2000_BRANDS) {
                return Some(found);
            }
        }

        if w.check_string("ftyp", 4) {
            if let Some(found) = scan_magic(w, HEIF_BRANDS) {
                return Some(found);
            }
        }

        scan_magic(w, TRAILING)
    }
}

fn is_tiff(w: &ByteWindow) -> bool {
    w.check_for_bytes(TIFF_LE, 0) || w.check_for_bytes(TIFF_BE, 0)
}
