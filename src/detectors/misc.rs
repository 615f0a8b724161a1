//! Everything else: 3D models, databases, data interchange formats,
//! Windows shell artefacts and a few text formats with fixed preambles.
//!
//! DWG, ASAR and ICC go through small structural validators rather than a
//! bare magic comparison.

use super::{hit, scan_magic, DetectorCategory, MagicTable, SignatureDetector};
use crate::detection::{ByteWindow, DetectionContext, MatchResult};
use serde_json::Value;
use std::ops::RangeInclusive;
use tracing::trace;

/// AutoCAD release codes accepted after the `AC` marker (R1.0 through 2018).
pub const DWG_VERSIONS: RangeInclusive<u32> = 1000..=1050;

const ASAR_HEADER: &[u8] = &[0x04, 0x00, 0x00, 0x00];
const ASAR_LENGTH_OFFSET: usize = 12;
const ASAR_JSON_OFFSET: usize = 16;
/// Top-level key every archive index carries.
const ASAR_REQUIRED_KEY: &str = "files";

const ICC_MIN_LEN: usize = 128;
const ICC_SIGNATURE_OFFSET: usize = 36;

const REGEDIT5: &str = "Windows Registry Editor Version 5.00";

/// Checked before the structural validators.
const LEADING: MagicTable = &[
    (0, b"BLENDER", "blend", "application/x-blender"),
    (0, b"SQLi", "sqlite", "application/x-sqlite3"),
    (0, b"g3drem", "g3drem", "application/octet-stream"),
    (0, b"silhouette05", "studio3", "application/octet-stream"),
    (0, b"DRACO", "drc", "application/vnd.google.draco"),
];

const MIDDLE: MagicTable = &[
    (0, b"glTF\x02\x00\x00\x00", "glb", "model/gltf-binary"),
    (0, b"Kaydara FBX Binary  \x00", "fbx", "application/x.autodesk.fbx"),
];

const TRAILING: MagicTable = &[
    (0, &[0xD4, 0xC3, 0xB2, 0xA1], "pcap", "application/vnd.tcpdump.pcap"),
    (0, &[0xA1, 0xB2, 0xC3, 0xD4], "pcap", "application/vnd.tcpdump.pcap"),
    (0, b"regf", "dat", "application/x-ft-windows-registry-hive"),
    (0, b"book\x00\x00\x00\x00mark\x00\x00\x00\x00", "alias", "application/x.apple.alias"),
    (
        0,
        &[
            0x4C, 0x00, 0x00, 0x00, 0x01, 0x14, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x46,
        ],
        "lnk",
        "application/x.ms.shortcut",
    ),
    (0, b"PAR1", "parquet", "application/vnd.apache.parquet"),
    (0, b"PARE", "parquet", "application/vnd.apache.parquet"),
    (
        2,
        &[0x27, 0x0A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        "shp",
        "application/x-esri-shape",
    ),
    (0, b"solid ", "stl", "model/stl"),
    (0, b"UNICORN", "unicorn", "application/unicorn"),
    (0, b"BEGIN:VCALENDAR", "ics", "text/calendar"),
    (0, b"BEGIN:VCARD", "vcf", "text/vcard"),
    (0, b"-----BEGIN PGP MESSAGE-----", "pgp", "application/pgp-encrypted"),
];

/// Detects assorted binary and text formats with fixed signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct MiscSignatureDetector;

impl SignatureDetector for MiscSignatureDetector {
    fn name(&self) -> &str {
        "misc"
    }

    fn category(&self) -> DetectorCategory {
        DetectorCategory::Misc
    }

    fn detect(&self, context: &DetectionContext) -> Option<MatchResult> {
        let w = context.window();

        if let Some(found) = scan_magic(w, LEADING) {
            return Some(found);
        }

        if is_mie(w) {
            return hit("mie", "application/x-mie");
        }
        if is_dwg(w) {
            return hit("dwg", "image/vnd.dwg");
        }
        if w.check_for_bytes(b"ARROW1\x00\x00", 0) {
            return hit("arrow", "application/vnd.apache.arrow.file");
        }
        if w.check_for_bytes(b"Obj\x01", 0) {
            return hit("avro", "application/avro");
        }
        if is_asar(w) {
            return hit("asar", "application/x-asar");
        }

        if let Some(found) = scan_magic(w, MIDDLE) {
            return Some(found);
        }

        if is_icc_profile(w) {
            return hit("icc", "application/vnd.iccprofile");
        }

        if let Some(found) = scan_magic(w, TRAILING) {
            return Some(found);
        }

        if is_webvtt(w) {
            return hit("vtt", "text/vtt");
        }
        if is_registry_script(w) {
            return hit("reg", "application/x-ms-regedit");
        }

        None
    }
}

fn is_mie(w: &ByteWindow) -> bool {
    w.check_string("0MIE", 4)
        && (w.check_for_bytes(&[0x7E, 0x10, 0x04], 0) || w.check_for_bytes(&[0x7E, 0x18, 0x04], 0))
}

/// `AC` followed by a four-digit release code within [`DWG_VERSIONS`].
pub fn is_dwg(w: &ByteWindow) -> bool {
    if !w.check_string("AC", 0) {
        return false;
    }
    let Some(digits) = w.slice(2, 4) else {
        return false;
    };
    if !digits.iter().all(u8::is_ascii_digit) {
        return false;
    }
    let version = digits
        .iter()
        .fold(0u32, |acc, &d| acc * 10 + u32::from(d - b'0'));
    DWG_VERSIONS.contains(&version)
}

/// Electron archive: a pickled header whose JSON index lists `files`.
///
/// The index length lives at offset 12 and the JSON itself starts at 16;
/// the whole index must be inside the window.
pub fn is_asar(w: &ByteWindow) -> bool {
    if !w.check_for_bytes(ASAR_HEADER, 0) {
        return false;
    }
    let Some(json_len) = w.read_u32_le(ASAR_LENGTH_OFFSET) else {
        return false;
    };
    if json_len as usize <= ASAR_LENGTH_OFFSET {
        return false;
    }
    let Some(json) = w.slice(ASAR_JSON_OFFSET, json_len as usize) else {
        trace!(json_len, window = w.len(), "asar index exceeds window");
        return false;
    };
    match serde_json::from_slice::<Value>(json) {
        Ok(index) => index
            .get(ASAR_REQUIRED_KEY)
            .is_some_and(|files| !files.is_null()),
        Err(err) => {
            trace!(error = %err, "asar index is not json");
            false
        }
    }
}

pub fn is_icc_profile(w: &ByteWindow) -> bool {
    w.len() >= ICC_MIN_LEN && w.check_string("acsp", ICC_SIGNATURE_OFFSET)
}

/// `WEBVTT` must be followed by a separator or end the window.
fn is_webvtt(w: &ByteWindow) -> bool {
    w.check_string("WEBVTT", 0)
        && matches!(w.get(6), None | Some(b'\n' | b'\r' | b'\t' | b' ' | 0x00))
}

/// Registry editor exports: REGEDIT4, the version 5 banner, or the banner
/// as UTF-16LE behind a byte order mark.
fn is_registry_script(w: &ByteWindow) -> bool {
    w.check_string("REGEDIT4", 0)
        || w.check_string(REGEDIT5, 0)
        || (w.check_for_bytes(&[0xFF, 0xFE], 0) && w.check_utf16le(REGEDIT5, 2))
}
