//! Audio and video containers.
//!
//! The ISO-BMFF `ftyp` brand is parsed first; anything it leaves unclaimed
//! goes through box literals, the EBML doctype search, RIFF form types, an
//! MPEG frame-sync probe and a flat magic table.

use super::{hit, DetectorCategory, SignatureDetector};
use crate::detection::{ByteWindow, DetectionContext, MatchResult};
use tracing::trace;

const FTYP: &[u8] = b"ftyp";
const FTYP_OFFSET: usize = 4;
const BRAND_OFFSET: usize = 8;
const BRAND_LEN: usize = 4;

/// Exact brand matches after normalisation.
const BRAND_TABLE: &[(&str, &str, &str)] = &[
    ("M4P", "m4p", "video/mp4"),
    ("M4B", "m4b", "audio/mp4"),
    ("M4A", "m4a", "audio/x-m4a"),
    ("F4V", "f4v", "video/mp4"),
    ("F4P", "f4p", "video/mp4"),
    ("F4A", "f4a", "audio/mp4"),
    ("F4B", "f4b", "audio/mp4"),
];

/// Brands at offset 8 that mark a generic MP4 when the box size starts 00 00 00.
const MP4_BRANDS: &[&[u8]] = &[b"mp41", b"mp42", b"isom", b"iso2", b"mmp4", b"M4V", b"dash"];

/// Box types at offset 4 that identify QuickTime movies.
const QUICKTIME_ATOMS: &[&[u8]] = &[b"free", b"ftypqt  ", b"mdat", b"moov", b"wide"];

const EBML_HEADER: &[u8] = &[0x1A, 0x45, 0xDF, 0xA3];
/// EBML DocType element id.
const EBML_DOCTYPE: &[u8] = &[0x42, 0x82];

const ASF_HEADER: &[u8] = &[0x30, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11, 0xA6, 0xD9];
const MXF_HEADER: &[u8] = &[
    0x06, 0x0E, 0x2B, 0x34, 0x02, 0x05, 0x01, 0x01, 0x0D, 0x01, 0x02, 0x01, 0x01, 0x02,
];

/// MPEG transport stream sync byte.
const TS_SYNC: u8 = 0x47;

/// Ogg codec identification headers at offset 28.
const OGG_CODECS: &[(&[u8], &str, &str)] = &[
    (b"\x80theora", "ogv", "video/ogg"),
    (b"\x01video\x00", "ogm", "video/ogg"),
    (b"\x7FFLAC", "oga", "audio/ogg"),
    (b"Speex  ", "spx", "audio/ogg"),
    (b"\x01vorbis", "ogg", "audio/ogg"),
];

/// RIFF form types at offset 8.
const RIFF_FORMS: &[(&[u8], &str, &str)] = &[
    (b"AVI", "avi", "video/vnd.avi"),
    (b"WAVE", "wav", "audio/vnd.wave"),
    (b"QLCM", "qcp", "audio/qcelp"),
    (b"ACON", "ani", "application/x-navi-animation"),
];

/// Flat signatures at offset 0 checked after the structural probes.
const TRAILING_MAGIC: &[(&[u8], &str, &str)] = &[
    (b"fLaC", "flac", "audio/x-flac"),
    (b"MAC ", "ape", "audio/ape"),
    (b"wvpk", "wv", "audio/wavpack"),
    (b"#!AMR\n", "amr", "audio/amr"),
    (b"FORM\x00", "aif", "audio/aiff"),
    (MXF_HEADER, "mxf", "application/mxf"),
];

/// Detects audio and video formats.
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaSignatureDetector;

impl SignatureDetector for MediaSignatureDetector {
    fn name(&self) -> &str {
        "media"
    }

    fn category(&self) -> DetectorCategory {
        DetectorCategory::Media
    }

    fn detect(&self, context: &DetectionContext) -> Option<MatchResult> {
        let w = context.window();

        if let Some(found) = iso_brand(w).and_then(|brand| classify_brand(&brand)) {
            return Some(found);
        }

        if w.check_for_bytes(&[0x0B, 0x77], 0) {
            return hit("ac3", "audio/vnd.dolby.dd-raw");
        }
        if w.check_string("MP+", 0) || w.check_string("MPCK", 0) {
            return hit("mpc", "audio/x-musepack");
        }
        if w.check_string("DSD ", 0) {
            return hit("dsf", "audio/x-dsf");
        }

        if is_mp4(w) {
            return hit("mp4", "video/mp4");
        }

        if w.check_string("MThd", 0) {
            return hit("mid", "audio/midi");
        }

        if let Some(found) = detect_matroska(w) {
            return Some(found);
        }

        if w.check_for_bytes(b"\x00\x00\x00\x14ftypqt  ", 0)
            || QUICKTIME_ATOMS
                .iter()
                .any(|atom| w.check_for_bytes(atom, FTYP_OFFSET))
        {
            return hit("mov", "video/quicktime");
        }

        if w.check_string(".RMF", 0) {
            return hit("rm", "application/vnd.rn-realmedia");
        }

        if w.check_string("RIFF", 0) {
            if let Some((_, ext, mime)) =
                RIFF_FORMS.iter().find(|(form, _, _)| w.check_for_bytes(form, 8))
            {
                return hit(ext, mime);
            }
        }

        if w.check_for_bytes(ASF_HEADER, 0) {
            return hit("wmv", "video/x-ms-wmv");
        }

        if w.check_for_bytes(&[0x00, 0x00, 0x01, 0xBA], 0)
            || w.check_for_bytes(&[0x00, 0x00, 0x01, 0xB3], 0)
        {
            return hit("mpg", "video/mpeg");
        }

        if w.check_string("ftyp3g", FTYP_OFFSET) {
            return hit("3gp", "video/3gpp");
        }

        if let Some(found) = probe_mpeg_frame(w) {
            return Some(found);
        }

        if w.check_string("ftypM4A", FTYP_OFFSET) || w.check_string("M4A ", 0) {
            return hit("m4a", "audio/mp4");
        }

        if w.check_string("OpusHead", 28) {
            return hit("opus", "audio/opus");
        }

        if w.check_string("OggS", 0) {
            let (ext, mime) = OGG_CODECS
                .iter()
                .find(|(codec, _, _)| w.check_for_bytes(codec, 28))
                .map_or(("ogx", "application/ogg"), |(_, ext, mime)| (*ext, *mime));
            return hit(ext, mime);
        }

        if let Some((_, ext, mime)) =
            TRAILING_MAGIC.iter().find(|(magic, _, _)| w.check_for_bytes(magic, 0))
        {
            return hit(ext, mime);
        }

        if is_transport_stream(w) {
            return hit("mts", "video/mp2t");
        }

        if w.check_for_bytes(b"FLV\x01", 0) {
            return hit("flv", "video/x-flv");
        }
        if w.check_string("dns.", 0) || w.check_string(".snd", 0) {
            return hit("au", "audio/basic");
        }
        if w.check_string("IMPM", 0) {
            return hit("it", "audio/x-it");
        }
        if w.check_string("SCRM", 44) {
            return hit("s3m", "audio/x-s3m");
        }
        if w.check_string("Extended Module:", 0) {
            return hit("xm", "audio/x-xm");
        }
        if w.check_string("Creative Voice File", 0) {
            return hit("voc", "audio/x-voc");
        }

        None
    }
}

/// Normalised major brand of an ISO-BMFF file.
///
/// Requires `ftyp` at offset 4 and four brand bytes at offset 8. NULs become
/// spaces, trailing spaces are dropped and the result is upper-cased; a blank
/// brand is `None`.
pub fn iso_brand(w: &ByteWindow) -> Option<String> {
    if !w.check_for_bytes(FTYP, FTYP_OFFSET) {
        return None;
    }
    let raw = w.slice(BRAND_OFFSET, BRAND_LEN)?;
    let brand: String = raw
        .iter()
        .map(|&b| if b == 0 { ' ' } else { char::from(b) })
        .collect();
    let brand = brand.trim_end_matches(' ').to_ascii_uppercase();
    trace!(brand = %brand, "iso-bmff brand");
    (!brand.is_empty()).then_some(brand)
}

/// Map a normalised brand to a format, or `None` when it is not one we name.
pub fn classify_brand(brand: &str) -> Option<MatchResult> {
    if brand == "QT" {
        return hit("mov", "video/quicktime");
    }
    if brand.starts_with("3G2") {
        return hit("3g2", "video/3gpp2");
    }
    if brand.starts_with("3G") {
        return hit("3gp", "video/3gpp");
    }
    if brand.starts_with("M4V") {
        return hit("m4v", "video/x-m4v");
    }
    BRAND_TABLE
        .iter()
        .find(|(key, _, _)| *key == brand)
        .and_then(|(_, ext, mime)| hit(ext, mime))
}

fn is_mp4(w: &ByteWindow) -> bool {
    if w.check_string("3gp5", 0) {
        return true;
    }
    w.check_for_bytes(&[0x00, 0x00, 0x00], 0)
        && w.check_for_bytes(FTYP, FTYP_OFFSET)
        && MP4_BRANDS.iter().any(|brand| w.check_for_bytes(brand, BRAND_OFFSET))
}

/// Locate the EBML DocType element and read its value.
fn detect_matroska(w: &ByteWindow) -> Option<MatchResult> {
    if !w.check_for_bytes(EBML_HEADER, 0) {
        return None;
    }
    // id (2 bytes) + one-byte size, then the doctype string
    let doctype = w.search_for_bytes(EBML_DOCTYPE, 0)? + 3;
    if w.check_string("matroska", doctype) {
        return hit("mkv", "video/x-matroska");
    }
    if w.check_string("webm", doctype) {
        return hit("webm", "video/webm");
    }
    None
}

/// Frame-sync probe at the first two offsets of windows longer than 16 bytes.
fn probe_mpeg_frame(w: &ByteWindow) -> Option<MatchResult> {
    let limit = w.len().saturating_sub(16).min(2);
    for offset in 0..limit {
        if w.check_string("ID3", offset)
            || w.check_for_bytes_masked(&[0xFF, 0xE2], offset, &[0xFF, 0xE2])
        {
            return hit("mp3", "audio/mpeg");
        }
        if w.check_for_bytes_masked(&[0xFF, 0xE4], offset, &[0xFF, 0xE4])
            || w.check_for_bytes_masked(&[0xFF, 0xF8], offset, &[0xFF, 0xFC])
        {
            return hit("mp2", "audio/mpeg");
        }
        if w.check_for_bytes_masked(&[0xFF, 0xF0], offset, &[0xFF, 0xFC]) {
            return hit("mp4", "audio/mpeg");
        }
    }
    None
}

/// Plain 188-byte packets, or 192-byte M2TS packets with a 4-byte timecode.
fn is_transport_stream(w: &ByteWindow) -> bool {
    let sync = |offset| w.get(offset) == Some(TS_SYNC);
    (sync(0) && sync(188)) || (sync(4) && (sync(192) || sync(196)))
}
