//! The high-level detectors and the lookup repository.

use crate::common::{write_fixture, zip_bytes};
use mimeprobe::{MimeDetector, MimeError, MimeTypeDetector, MimeTypeRepository};
use tempfile::TempDir;

#[test]
fn test_type_detector_over_files() {
    let dir = TempDir::new().unwrap();
    let pdf = write_fixture(&dir, "doc", b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n");
    let jar = write_fixture(
        &dir,
        "lib",
        &zip_bytes(&[("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\r\n")]),
    );

    let mut detector = MimeTypeDetector::from_path(&pdf).unwrap();
    assert_eq!(detector.mime_type(), "application/pdf");
    assert_eq!(detector.file_extension(), "pdf");

    let found = detector.detect_file(&jar).unwrap().unwrap();
    assert_eq!(found.mime_type(), "application/java-archive");
    assert_eq!(detector.source(), Some(jar.as_path()));
}

#[test]
fn test_missing_file_errors() {
    let dir = TempDir::new().unwrap();
    let absent = dir.path().join("absent");
    assert!(matches!(
        MimeTypeDetector::from_path(&absent).unwrap_err(),
        MimeError::FileNotReadable { .. }
    ));
    assert!(matches!(
        MimeDetector::new(&absent).unwrap_err(),
        MimeError::FileDoesNotExist { .. }
    ));
    assert!(matches!(
        MimeDetector::new(dir.path()).unwrap_err(),
        MimeError::FileDoesNotExist { .. }
    ));
}

#[test]
fn test_mime_detector_helpers() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "pixel", b"GIF89a\x01\x00\x01\x00");
    let detector = MimeDetector::new(&path).unwrap();

    assert_eq!(detector.mime_type(), "image/gif");
    assert_eq!(detector.file_extension(), "gif");
    assert_eq!(detector.file_hash().len(), 64);
    assert!(detector
        .base64_data_uri()
        .unwrap()
        .starts_with("data:image/gif;base64,R0lGODlh"));
    assert_eq!(detector.font_awesome_icon(None, true), "fa fa-file-image-o fa-fw");
}

#[test]
fn test_hash_depends_on_whole_file() {
    let dir = TempDir::new().unwrap();
    let mut long = b"GIF89a".to_vec();
    long.extend(vec![0u8; 10_000]);
    let a = write_fixture(&dir, "a", &long);
    long.push(1);
    let b = write_fixture(&dir, "b", &long);

    let first = MimeDetector::new(&a).unwrap();
    let second = MimeDetector::new(&b).unwrap();
    assert_eq!(first.mime_type(), second.mime_type());
    assert_ne!(first.file_hash(), second.file_hash());
}

#[test]
fn test_repository_queries() {
    let repository = MimeTypeRepository::default();
    assert_eq!(repository.extension_for_mime_type("image/jpeg"), "jpg");
    assert!(repository
        .mime_types_for_extension("JPG")
        .iter()
        .any(|m| m == "image/jpeg"));
    assert!(repository.mime_types_for_extension("no-such-ext").is_empty());
    assert_eq!(repository.extension_for_mime_type("application/x-unknown"), "");

    let mut custom = MimeTypeRepository::empty();
    custom.register("foo", ["application/x-foo"]);
    assert_eq!(custom.extension_for_mime_type("application/x-foo"), "foo");
    assert_eq!(custom.len(), 1);
}
