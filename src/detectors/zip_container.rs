//! ZIP container disambiguation.
//!
//! Many formats are ZIP archives underneath: ODF and EPUB declare their
//! type in a stored `mimetype` entry, OOXML in `[Content_Types].xml`, and
//! APK/JAR/XPI are recognisable by well-known entry names. When the file
//! can be opened through a [`ContainerReader`] those entries are read
//! directly; otherwise the captured window is scanned for the same strings.

use super::{hit, DetectorCategory, SignatureDetector};
use crate::config::ContainerConfig;
use crate::containers::{default_reader, ContainerListing, ContainerReader, UnavailableReader};
use crate::detection::{DetectionContext, MatchResult};
use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use std::path::Path;
use tracing::trace;

/// Local file header signature.
const LOCAL_FILE_HEADER: &[u8] = &[0x50, 0x4B, 0x03, 0x04];

/// Content-type keys in precedence order.
///
/// Several keys are prefixes of others (`...text` and `...text-template`,
/// `...macroenabled` and `...macroenabled.12`); the longer form is listed
/// first so that a substring scan settles on it.
const CONTENT_TYPES: &[(&str, &str, &str)] = &[
    ("application/epub+zip", "epub", "application/epub+zip"),
    (
        "application/vnd.oasis.opendocument.text-template",
        "ott",
        "application/vnd.oasis.opendocument.text-template",
    ),
    (
        "application/vnd.oasis.opendocument.text",
        "odt",
        "application/vnd.oasis.opendocument.text",
    ),
    (
        "application/vnd.oasis.opendocument.spreadsheet-template",
        "ots",
        "application/vnd.oasis.opendocument.spreadsheet-template",
    ),
    (
        "application/vnd.oasis.opendocument.spreadsheet",
        "ods",
        "application/vnd.oasis.opendocument.spreadsheet",
    ),
    (
        "application/vnd.oasis.opendocument.presentation-template",
        "otp",
        "application/vnd.oasis.opendocument.presentation-template",
    ),
    (
        "application/vnd.oasis.opendocument.presentation",
        "odp",
        "application/vnd.oasis.opendocument.presentation",
    ),
    (
        "application/vnd.oasis.opendocument.graphics-template",
        "otg",
        "application/vnd.oasis.opendocument.graphics-template",
    ),
    (
        "application/vnd.oasis.opendocument.graphics",
        "odg",
        "application/vnd.oasis.opendocument.graphics",
    ),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    (
        "application/vnd.ms-word.document.macroenabled.12",
        "docm",
        "application/vnd.ms-word.document.macroenabled.12",
    ),
    (
        "application/vnd.ms-word.document.macroenabled",
        "docm",
        "application/vnd.ms-word.document.macroenabled.12",
    ),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.template",
        "dotx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.template",
    ),
    (
        "application/vnd.ms-word.template.macroenabled.12",
        "dotm",
        "application/vnd.ms-word.template.macroenabled.12",
    ),
    (
        "application/vnd.ms-word.template.macroenabledtemplate",
        "dotm",
        "application/vnd.ms-word.template.macroenabled.12",
    ),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    (
        "application/vnd.ms-powerpoint.presentation.macroenabled.12",
        "pptm",
        "application/vnd.ms-powerpoint.presentation.macroenabled.12",
    ),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.template",
        "potx",
        "application/vnd.openxmlformats-officedocument.presentationml.template",
    ),
    (
        "application/vnd.ms-powerpoint.template.macroenabled.12",
        "potm",
        "application/vnd.ms-powerpoint.template.macroenabled.12",
    ),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.slideshow",
        "ppsx",
        "application/vnd.openxmlformats-officedocument.presentationml.slideshow",
    ),
    (
        "application/vnd.ms-powerpoint.slideshow.macroenabled.12",
        "ppsm",
        "application/vnd.ms-powerpoint.slideshow.macroenabled.12",
    ),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    (
        "application/vnd.ms-excel.sheet.macroenabled.12",
        "xlsm",
        "application/vnd.ms-excel.sheet.macroenabled.12",
    ),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.template",
        "xltx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.template",
    ),
    (
        "application/vnd.ms-excel.template.macroenabled.12",
        "xltm",
        "application/vnd.ms-excel.template.macroenabled.12",
    ),
    (
        "application/vnd.ms-package.3dmanufacturing-3dmodel+xml",
        "3mf",
        "model/3mf",
    ),
    ("application/vnd.ms-visio.drawing", "vsdx", "application/vnd.visio"),
    ("application/vnd.ms-visio.drawing.main+xml", "vsdx", "application/vnd.visio"),
    (
        "application/vnd.ms-visio.template.main+xml",
        "vstx",
        "application/vnd.ms-visio.template.main+xml",
    ),
];

static CONTENT_TYPE_TABLE: Lazy<ContentTypeTable> = Lazy::new(ContentTypeTable::build);

/// Ordered mapping from a lowercase content-type string to `(extension, mime)`.
#[derive(Debug)]
pub struct ContentTypeTable {
    entries: &'static [(&'static str, &'static str, &'static str)],
    matcher: AhoCorasick,
}

impl ContentTypeTable {
    /// Panics only if the fixed key literals above stop compiling into an automaton.
    fn build() -> Self {
        let matcher = AhoCorasick::new(CONTENT_TYPES.iter().map(|(key, _, _)| key))
            .expect("valid content-type patterns");
        Self {
            entries: CONTENT_TYPES,
            matcher,
        }
    }

    /// The shared, process-wide table.
    pub fn global() -> &'static ContentTypeTable {
        &CONTENT_TYPE_TABLE
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in precedence order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(key, _, _)| *key)
    }

    /// Exact lookup of an already normalized content type.
    pub fn lookup(&self, content_type: &str) -> Option<MatchResult> {
        self.entries
            .iter()
            .find(|(key, _, _)| *key == content_type)
            .map(|(_, ext, mime)| MatchResult::new(*ext, *mime))
    }

    /// The earliest-declared key that occurs anywhere in `haystack`.
    ///
    /// Declaration order decides, not position in the haystack.
    pub fn find_in(&self, haystack: &str) -> Option<MatchResult> {
        let index = self
            .matcher
            .find_overlapping_iter(haystack)
            .map(|m| m.pattern().as_usize())
            .min()?;
        let (_, ext, mime) = self.entries[index];
        Some(MatchResult::new(ext, mime))
    }
}

/// Detects ZIP-based formats (OOXML, ODF, EPUB, APK, JAR, XPI) and plain ZIP.
#[derive(Debug)]
pub struct ZipSignatureDetector {
    reader: Box<dyn ContainerReader>,
}

impl Default for ZipSignatureDetector {
    fn default() -> Self {
        Self::new(default_reader())
    }
}

impl ZipSignatureDetector {
    pub fn new(reader: Box<dyn ContainerReader>) -> Self {
        Self { reader }
    }

    /// Raw-scan only.
    pub fn unavailable() -> Self {
        Self::new(Box::new(UnavailableReader))
    }

    pub fn from_config(config: &ContainerConfig) -> Self {
        if config.use_archive_reader {
            Self::default()
        } else {
            Self::unavailable()
        }
    }

    fn detect_with_reader(&self, path: &Path) -> Option<MatchResult> {
        let mut listing = self.reader.open(path)?;
        let table = ContentTypeTable::global();

        if let Some(declared) = listing.entry("mimetype") {
            let declared = String::from_utf8_lossy(&declared)
                .trim_matches(|c: char| c.is_ascii_whitespace() || c == '\0')
                .to_ascii_lowercase();
            trace!(mimetype = %declared, "zip mimetype entry");
            if let Some(found) = table.lookup(&declared) {
                return Some(found);
            }
        }

        if let Some(types) = listing.entry("[Content_Types].xml") {
            let types = String::from_utf8_lossy(&types).to_ascii_lowercase();
            if let Some(found) = table.find_in(&types) {
                return Some(found);
            }
        }

        classify_by_entries(listing.as_ref())
    }

    fn detect_by_scan(&self, context: &DetectionContext) -> Option<MatchResult> {
        let text = context.window().slice_as_text(0, None).to_ascii_lowercase();
        if let Some(found) = ContentTypeTable::global().find_in(&text) {
            return Some(found);
        }

        if text.contains("meta-inf/mozilla.rsa") {
            return hit("xpi", "application/x-xpinstall");
        }
        if text.contains("classes.dex") {
            return hit("apk", "application/vnd.android.package-archive");
        }
        if text.contains("meta-inf/manifest.mf") {
            return hit("jar", "application/java-archive");
        }
        None
    }
}

fn classify_by_entries(listing: &dyn ContainerListing) -> Option<MatchResult> {
    if listing.has_entry("classes.dex", true) {
        return hit("apk", "application/vnd.android.package-archive");
    }
    if listing.has_entry("META-INF/mozilla.rsa", true) {
        return hit("xpi", "application/x-xpinstall");
    }
    if listing.has_entry("META-INF/MANIFEST.MF", true) {
        return hit("jar", "application/java-archive");
    }
    None
}

impl SignatureDetector for ZipSignatureDetector {
    fn name(&self) -> &str {
        "zip"
    }

    fn category(&self) -> DetectorCategory {
        DetectorCategory::Archive
    }

    fn detect(&self, context: &DetectionContext) -> Option<MatchResult> {
        if !context.window().check_for_bytes(LOCAL_FILE_HEADER, 0) {
            return None;
        }

        if let Some(path) = context.source() {
            if let Some(found) = self.detect_with_reader(path) {
                return Some(found);
            }
            trace!(path = %path.display(), "falling back to raw zip scan");
        }

        self.detect_by_scan(context)
            .or_else(|| hit("zip", "application/zip"))
    }
}
