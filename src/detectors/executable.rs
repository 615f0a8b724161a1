//! Executables, bytecode and ROM images.

use super::{hit, scan_magic, DetectorCategory, MagicTable, SignatureDetector};
use crate::detection::{DetectionContext, MatchResult};

const NATIVE: MagicTable = &[
    (0, b"MZ", "exe", "application/x-msdownload"),
    (0, b"\x7FELF", "elf", "application/x-elf"),
    (0, &[0xCF, 0xFA, 0xED, 0xFE], "macho", "application/x-mach-binary"),
    (0, &[0xFE, 0xED, 0xFA, 0xCF], "macho", "application/x-mach-binary"),
    (0, &[0xCA, 0xFE, 0xBA, 0xBE], "class", "application/java-vm"),
];

const BYTECODE: MagicTable = &[
    (0, b"\x00asm", "wasm", "application/wasm"),
    (0, b"\x1BLua", "luac", "application/x-lua-bytecode"),
    (0, b"NES\x1A", "nes", "application/x-nintendo-nes-rom"),
    (0, b"Cr24", "crx", "application/x-google-chrome-extension"),
];

/// Detects PE, ELF, Mach-O, Java class files and other runnable payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutableSignatureDetector;

impl SignatureDetector for ExecutableSignatureDetector {
    fn name(&self) -> &str {
        "executable"
    }

    fn category(&self) -> DetectorCategory {
        DetectorCategory::Binary
    }

    fn detect(&self, context: &DetectionContext) -> Option<MatchResult> {
        let w = context.window();

        if let Some(found) = scan_magic(w, NATIVE) {
            return Some(found);
        }

        // FWS (uncompressed) or CWS (zlib) Flash movie
        if matches!(w.get(0), Some(b'C' | b'F')) && w.check_string("WS", 1) {
            return hit("swf", "application/x-shockwave-flash");
        }

        scan_magic(w, BYTECODE)
    }
}
