//! Built-in signature detectors.
//!
//! Each detector owns one family of formats. Most are flat magic-number
//! tables; the archive, zip, media and misc detectors also carry the
//! structural checks (TAR checksum, ZIP disambiguation, ISO-BMFF brand,
//! ASAR/DWG/ICC validation).

pub mod archive;
pub mod document;
pub mod executable;
pub mod font;
pub mod image;
pub mod media;
pub mod misc;
pub mod xml;
pub mod zip_container;

use crate::config::DetectorConfig;
use crate::detection::{ByteWindow, DetectionContext, MatchResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub use archive::ArchiveSignatureDetector;
pub use document::DocumentSignatureDetector;
pub use executable::ExecutableSignatureDetector;
pub use font::FontSignatureDetector;
pub use image::ImageSignatureDetector;
pub use media::MediaSignatureDetector;
pub use misc::MiscSignatureDetector;
pub use xml::XmlSignatureDetector;
pub use zip_container::{ContentTypeTable, ZipSignatureDetector};

/// Logical grouping used for reporting and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectorCategory {
    Archive,
    Binary,
    Document,
    Font,
    Image,
    Media,
    Misc,
    Text,
    Custom,
}

impl fmt::Display for DetectorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use DetectorCategory::*;
        let label = match self {
            Archive => "archive",
            Binary => "binary",
            Document => "document",
            Font => "font",
            Image => "image",
            Media => "media",
            Misc => "misc",
            Text => "text",
            Custom => "custom",
        };
        f.write_str(label)
    }
}

/// A stateless strategy that recognises formats from a detection context.
pub trait SignatureDetector: Send + Sync {
    /// Stable identifier used in logs.
    fn name(&self) -> &str;

    fn category(&self) -> DetectorCategory {
        DetectorCategory::Custom
    }

    /// Return a match when the window carries a recognised signature.
    ///
    /// Malformed structures are a miss, never an error.
    fn detect(&self, context: &DetectionContext) -> Option<MatchResult>;
}

/// Shorthand used by the built-in detectors.
pub(crate) fn hit(extension: &str, mime_type: &str) -> Option<MatchResult> {
    Some(MatchResult::new(extension, mime_type))
}

/// `(offset, magic, extension, mime)` rows, checked top to bottom.
pub(crate) type MagicTable = &'static [(usize, &'static [u8], &'static str, &'static str)];

/// First row of `table` whose magic occurs at its offset.
pub(crate) fn scan_magic(window: &ByteWindow, table: MagicTable) -> Option<MatchResult> {
    table
        .iter()
        .find(|(offset, magic, _, _)| window.check_for_bytes(magic, *offset))
        .and_then(|(_, _, ext, mime)| hit(ext, mime))
}

/// Built-in detectors in pipeline order.
///
/// Image runs first since it owns the HEIF/AVIF `ftyp` brands that the
/// media detector would otherwise leave unclaimed. Zip must precede the
/// generic archive table.
pub fn default_detectors(config: &DetectorConfig) -> Vec<Arc<dyn SignatureDetector>> {
    vec![
        Arc::new(ImageSignatureDetector),
        Arc::new(ZipSignatureDetector::from_config(&config.containers)),
        Arc::new(ArchiveSignatureDetector),
        Arc::new(MediaSignatureDetector),
        Arc::new(DocumentSignatureDetector),
        Arc::new(FontSignatureDetector),
        Arc::new(ExecutableSignatureDetector),
        Arc::new(MiscSignatureDetector),
        Arc::new(XmlSignatureDetector),
    ]
}
