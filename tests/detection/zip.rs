//! ZIP disambiguation through the archive reader and the raw window scan.

use crate::common::{classify_bytes, classify_path, pair, write_fixture, zip_bytes};
use mimeprobe::detectors::ZipSignatureDetector;
use mimeprobe::{DetectorConfig, DetectorPipeline, SignatureDetector};
use std::sync::Arc;
use tempfile::TempDir;

const APK: (&str, &str) = ("apk", "application/vnd.android.package-archive");
const JAR: (&str, &str) = ("jar", "application/java-archive");
const XPI: (&str, &str) = ("xpi", "application/x-xpinstall");
const ZIP: (&str, &str) = ("zip", "application/zip");
const DOCX: (&str, &str) = (
    "docx",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
);

const OOXML_TYPES: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Override PartName="/word/document.xml"
 ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

fn reader_pipeline() -> DetectorPipeline {
    DetectorPipeline::with_defaults(&DetectorConfig::default())
}

fn scan_pipeline() -> DetectorPipeline {
    let config =
        DetectorConfig::from_json_str(r#"{"containers": {"use_archive_reader": false}}"#).unwrap();
    DetectorPipeline::with_defaults(&config)
}

/// Classify the same archive bytes through both tiers.
fn classify_both(entries: &[(&str, &[u8])]) -> [Option<(String, String)>; 3] {
    let dir = TempDir::new().unwrap();
    let bytes = zip_bytes(entries);
    let path = write_fixture(&dir, "archive.bin", &bytes);
    [
        classify_path(&reader_pipeline(), &path, 4096),
        classify_path(&scan_pipeline(), &path, 4096),
        classify_bytes(&bytes),
    ]
}

fn assert_all(entries: &[(&str, &[u8])], expected: (&str, &str)) {
    for (tier, found) in classify_both(entries).into_iter().enumerate() {
        assert_eq!(found, pair(expected.0, expected.1), "tier {tier}");
    }
}

#[test]
fn test_apk_by_dex_entry() {
    assert_all(&[("classes.dex", b"dex\n035\0")], APK);
}

#[test]
fn test_jar_by_manifest() {
    assert_all(
        &[
            ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\r\n"),
            ("com/example/Main.class", &[0xCA, 0xFE, 0xBA, 0xBE]),
        ],
        JAR,
    );
}

#[test]
fn test_xpi_by_signature_entry() {
    assert_all(
        &[
            ("META-INF/mozilla.rsa", b"\x30\x82"),
            ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\r\n"),
        ],
        XPI,
    );
}

#[test]
fn test_plain_zip() {
    assert_all(&[("readme.txt", b"hello")], ZIP);
}

#[test]
fn test_odf_mimetype_entry() {
    assert_all(
        &[
            ("mimetype", b"application/vnd.oasis.opendocument.text"),
            ("content.xml", b"<office:document-content/>"),
        ],
        ("odt", "application/vnd.oasis.opendocument.text"),
    );
}

#[test]
fn test_epub_mimetype_entry() {
    assert_all(
        &[("mimetype", b"application/epub+zip"), ("META-INF/container.xml", b"<container/>")],
        ("epub", "application/epub+zip"),
    );
}

#[test]
fn test_ooxml_content_types() {
    assert_all(
        &[("[Content_Types].xml", OOXML_TYPES), ("word/document.xml", b"<w:document/>")],
        DOCX,
    );
}

#[test]
fn test_truncated_archive_falls_back_to_scan() {
    let dir = TempDir::new().unwrap();
    let bytes = zip_bytes(&[
        ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\r\n"),
        ("padding.bin", &[0u8; 256]),
    ]);
    // drop the central directory so the reader cannot open it
    let truncated = &bytes[..bytes.len() / 2];
    let path = write_fixture(&dir, "cut.bin", truncated);
    assert_eq!(classify_path(&reader_pipeline(), &path, 4096), pair(JAR.0, JAR.1));
}

#[test]
fn test_reader_sees_entries_past_the_window() {
    let dir = TempDir::new().unwrap();
    let filler = vec![0x55u8; 8192];
    let bytes = zip_bytes(&[
        ("assets/blob.bin", filler.as_slice()),
        ("classes.dex", b"dex\n035\0"),
    ]);
    let path = write_fixture(&dir, "late.bin", &bytes);

    assert_eq!(classify_path(&reader_pipeline(), &path, 4096), pair(APK.0, APK.1));
    assert_eq!(classify_path(&scan_pipeline(), &path, 4096), pair(ZIP.0, ZIP.1));
}

#[test]
fn test_detector_can_be_injected() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "a.bin", &zip_bytes(&[("classes.dex", b"dex")]));
    let detectors: Vec<Arc<dyn SignatureDetector>> =
        vec![Arc::new(ZipSignatureDetector::unavailable())];
    let pipeline = DetectorPipeline::new(detectors);
    assert_eq!(classify_path(&pipeline, &path, 4096), pair(APK.0, APK.1));
}

#[test]
fn test_mimetype_entry_padding_is_stripped() {
    let dir = TempDir::new().unwrap();
    let filler = vec![0x20u8; 512];
    let bytes = zip_bytes(&[
        ("OEBPS/cover.txt", filler.as_slice()),
        ("mimetype", b"\x00application/epub+zip\x00\r\n"),
    ]);
    let path = write_fixture(&dir, "book.bin", &bytes);

    // the window ends before the mimetype entry, so only the reader can see it
    assert_eq!(
        classify_path(&reader_pipeline(), &path, 64),
        pair("epub", "application/epub+zip")
    );
    assert_eq!(classify_path(&scan_pipeline(), &path, 64), pair(ZIP.0, ZIP.1));
}
