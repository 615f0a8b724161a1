//! Archive and compression formats.
//!
//! Fixed-offset magic checks for tar, cpio, rar, gzip, bzip2, 7z, dmg, cab,
//! deb, ar, rpm, compress, lzip, xz, zstd, lz4, ace, arj and lzh. TAR also
//! gets a header checksum fallback for pre-POSIX archives without the
//! `ustar` marker.

use super::{hit, DetectorCategory, SignatureDetector};
use crate::detection::{ByteWindow, DetectionContext, MatchResult};
use tracing::trace;

/// TAR header block size.
const TAR_BLOCK: usize = 512;
/// Offset of the `ustar` marker in a POSIX header.
const TAR_MAGIC_OFFSET: usize = 257;
/// Checksum field: 8 bytes of octal ASCII.
const TAR_CHECKSUM_OFFSET: usize = 148;
const TAR_CHECKSUM_LEN: usize = 8;

const DEB_MAGIC: &[u8] = b"!<arch>\ndebian-binary";
const AR_MAGIC: &[u8] = b"!<arch>";
const RAR_MAGIC: &[u8] = &[0x52, 0x61, 0x72, 0x21, 0x1A, 0x07];

/// LZH method ids found at offset 2.
const LZH_METHODS: &[&str] = &[
    "-lh0-", "-lh1-", "-lh2-", "-lh3-", "-lh4-", "-lh5-", "-lh6-", "-lh7-", "-lzs-", "-lz4-",
    "-lz5-", "-lhd-",
];

/// Detects archive formats such as RAR, TAR and gzip.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveSignatureDetector;

impl SignatureDetector for ArchiveSignatureDetector {
    fn name(&self) -> &str {
        "archive"
    }

    fn category(&self) -> DetectorCategory {
        DetectorCategory::Archive
    }

    fn detect(&self, context: &DetectionContext) -> Option<MatchResult> {
        let w = context.window();

        if is_tar_archive(w) {
            return hit("tar", "application/x-tar");
        }

        if w.check_for_bytes(&[0xC7, 0x71], 0) || w.check_string("070707", 0) {
            return hit("cpio", "application/x-cpio");
        }

        // RAR 1.5-4.x has 0x00 at offset 6, RAR 5 has 0x01
        if matches!(w.get(6), Some(0x00 | 0x01)) && w.check_for_bytes(RAR_MAGIC, 0) {
            return hit("rar", "application/x-rar-compressed");
        }

        if w.check_for_bytes(&[0x1F, 0x8B, 0x08], 0) {
            return hit("gz", "application/gzip");
        }

        if w.check_for_bytes(b"BZh", 0) {
            return hit("bz2", "application/x-bzip2");
        }

        if w.check_for_bytes(&[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C], 0) {
            return hit("7z", "application/x-7z-compressed");
        }

        if w.check_for_bytes(&[0x78, 0x01], 0) {
            return hit("dmg", "application/x-apple-diskimage");
        }

        if w.check_for_bytes(b"MSCF", 0) || w.check_for_bytes(b"ISc(", 0) {
            return hit("cab", "application/vnd.ms-cab-compressed");
        }

        // deb is an ar archive whose first member is debian-binary
        if w.check_for_bytes(DEB_MAGIC, 0) {
            return hit("deb", "application/x-deb");
        }

        if w.check_for_bytes(AR_MAGIC, 0) {
            return hit("ar", "application/x-unix-archive");
        }

        if w.check_for_bytes(&[0xED, 0xAB, 0xEE, 0xDB], 0) {
            return hit("rpm", "application/x-rpm");
        }

        if w.check_for_bytes(&[0x1F, 0xA0], 0) || w.check_for_bytes(&[0x1F, 0x9D], 0) {
            return hit("z", "application/x-compress");
        }

        if w.check_for_bytes(b"LZIP", 0) {
            return hit("lz", "application/x-lzip");
        }

        if w.check_for_bytes(&[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00], 0) {
            return hit("xz", "application/x-xz");
        }

        if w.check_for_bytes(&[0x28, 0xB5, 0x2F, 0xFD], 0) {
            return hit("zst", "application/zstd");
        }

        if w.check_for_bytes(&[0x04, 0x22, 0x4D, 0x18], 0) {
            return hit("lz4", "application/x-lz4");
        }

        if w.check_string("**ACE", 7) && w.check_string("**", 12) {
            return hit("ace", "application/x-ace-compressed");
        }

        if w.check_for_bytes(&[0x60, 0xEA], 0) {
            return hit("arj", "application/x-arj");
        }

        if LZH_METHODS.iter().any(|method| w.check_string(method, 2)) {
            return hit("lzh", "application/x-lzh-compressed");
        }

        None
    }
}

/// POSIX marker first, then the header checksum for older archives.
pub fn is_tar_archive(w: &ByteWindow) -> bool {
    if w.len() < TAR_BLOCK {
        return false;
    }
    if w.check_string("ustar", TAR_MAGIC_OFFSET) {
        return true;
    }
    tar_checksum_matches(w)
}

/// Compare the octal checksum field with the unsigned sum of the header,
/// where the checksum field itself counts as eight spaces.
pub fn tar_checksum_matches(w: &ByteWindow) -> bool {
    let Some(header) = w.slice(0, TAR_BLOCK) else {
        return false;
    };
    let field = &header[TAR_CHECKSUM_OFFSET..TAR_CHECKSUM_OFFSET + TAR_CHECKSUM_LEN];
    let Some(stored) = parse_tar_checksum(field) else {
        return false;
    };

    let computed = tar_header_sum(header);
    trace!(stored, computed, "tar checksum comparison");
    stored == computed
}

/// Sum of a 512-byte header with the checksum field replaced by spaces.
pub fn tar_header_sum(header: &[u8]) -> u64 {
    header
        .iter()
        .enumerate()
        .map(|(i, &b)| {
            if (TAR_CHECKSUM_OFFSET..TAR_CHECKSUM_OFFSET + TAR_CHECKSUM_LEN).contains(&i) {
                u64::from(b' ')
            } else {
                u64::from(b)
            }
        })
        .sum()
}

/// Trailing NULs and spaces are padding; anything else must be octal digits.
fn parse_tar_checksum(field: &[u8]) -> Option<u64> {
    let end = field
        .iter()
        .rposition(|&b| b != 0 && b != b' ')
        .map_or(0, |p| p + 1);
    let digits = &field[..end];
    if digits.is_empty() || !digits.iter().all(|b| (b'0'..=b'7').contains(b)) {
        return None;
    }
    digits
        .iter()
        .try_fold(0u64, |acc, &d| acc.checked_mul(8)?.checked_add(u64::from(d - b'0')))
}
