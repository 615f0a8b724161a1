//! Configuration loading and window sizing.

use crate::common::{classify_path, pair, write_fixture, zip_bytes};
use mimeprobe::config::{DEFAULT_WINDOW_LENGTH, MIN_WINDOW_LENGTH};
use mimeprobe::{ByteWindow, DetectorConfig, DetectorPipeline, MimeError, MimeTypeDetector};
use tempfile::TempDir;

#[test]
fn test_json_config_overrides_defaults() {
    let config = DetectorConfig::from_json_str(
        r#"{"window": {"max_length": 512}, "containers": {"use_archive_reader": false}}"#,
    )
    .unwrap();
    assert_eq!(config.window.max_length, 512);
    assert!(!config.containers.use_archive_reader);

    let partial = DetectorConfig::from_json_str(r#"{"window": {"max_length": 64}}"#).unwrap();
    assert!(partial.containers.use_archive_reader);
    assert_eq!(DetectorConfig::from_json_str("{}").unwrap(), DetectorConfig::default());
}

#[test]
fn test_config_rejects_tiny_windows() {
    let err = DetectorConfig::from_json_str(r#"{"window": {"max_length": 3}}"#).unwrap_err();
    assert!(matches!(
        err,
        MimeError::InvalidWindowLength {
            length: 3,
            minimum: MIN_WINDOW_LENGTH
        }
    ));
    assert!(err.is_configuration());

    assert!(DetectorConfig::default().with_max_window_length(MIN_WINDOW_LENGTH).is_ok());
    assert!(ByteWindow::from_bytes(vec![0u8; 8], 2).is_err());
}

#[test]
fn test_malformed_json_is_a_configuration_error() {
    let err = DetectorConfig::from_json_str("{window: 12").unwrap_err();
    assert!(matches!(err, MimeError::InvalidConfiguration(_)));
}

#[test]
fn test_window_is_capped() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "big.bin", &vec![0x41u8; DEFAULT_WINDOW_LENGTH * 3]);

    let window = ByteWindow::from_path(&path, DEFAULT_WINDOW_LENGTH).unwrap();
    assert_eq!(window.len(), DEFAULT_WINDOW_LENGTH);
    assert_eq!(window.max_length(), DEFAULT_WINDOW_LENGTH);

    let small = ByteWindow::from_path(&path, 16).unwrap();
    assert_eq!(small.len(), 16);
}

#[test]
fn test_small_window_hides_late_markers() {
    let dir = TempDir::new().unwrap();
    let filler = vec![0x20u8; 1024];
    let bytes = zip_bytes(&[("padding.txt", filler.as_slice()), ("classes.dex", b"dex")]);
    let path = write_fixture(&dir, "late.bin", &bytes);

    let config = DetectorConfig::from_json_str(
        r#"{"window": {"max_length": 256}, "containers": {"use_archive_reader": false}}"#,
    )
    .unwrap();
    let pipeline = DetectorPipeline::with_defaults(&config);
    assert_eq!(classify_path(&pipeline, &path, 256), pair("zip", "application/zip"));
    assert_eq!(
        classify_path(&pipeline, &path, 4096),
        pair("apk", "application/vnd.android.package-archive")
    );

    let detector = MimeTypeDetector::with_config(&path, config).unwrap();
    assert_eq!(detector.file_extension(), "zip");
}
