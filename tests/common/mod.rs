//! Common test utilities and helpers.
//!
//! Fixtures are generated on the fly rather than checked in, so every
//! helper here returns bytes or writes them under a [`TempDir`].

use mimeprobe::{ByteWindow, DetectionContext, DetectorConfig, DetectorPipeline, MatchResult};
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Write `bytes` to `name` inside `dir` and return the full path.
pub fn write_fixture(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).expect("write fixture");
    path
}

/// Serialize a ZIP archive with stored (uncompressed) entries.
///
/// Stored entries keep names and payloads visible in the raw bytes, which
/// the window-scan path depends on.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, body) in entries {
        writer.start_file(*name, options).expect("start zip entry");
        writer.write_all(body).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// Route library events to the test output; set `RUST_LOG=trace` to see them.
pub fn init_logging() {
    mimeprobe::logging::init_tracing();
}

/// Run the default pipeline over in-memory bytes.
pub fn classify_bytes(bytes: &[u8]) -> Option<(String, String)> {
    init_logging();
    let config = DetectorConfig::default();
    let window = ByteWindow::from_bytes(bytes.to_vec(), config.window.max_length).expect("window");
    let context = DetectionContext::from_window(window);
    DetectorPipeline::with_defaults(&config)
        .detect(&context)
        .map(MatchResult::into_parts)
}

/// Run a pipeline over a file on disk.
pub fn classify_path(
    pipeline: &DetectorPipeline,
    path: &Path,
    max_length: usize,
) -> Option<(String, String)> {
    init_logging();
    let context = DetectionContext::from_path(path, max_length).expect("context");
    pipeline.detect(&context).map(MatchResult::into_parts)
}

pub fn pair(ext: &str, mime: &str) -> Option<(String, String)> {
    Some((ext.to_string(), mime.to_string()))
}

/// A 512-byte pre-POSIX tar header for `name` with a correct checksum.
pub fn v7_tar_header(name: &str) -> Vec<u8> {
    let mut header = vec![0u8; 512];
    header[..name.len()].copy_from_slice(name.as_bytes());
    header[100..108].copy_from_slice(b"0000644\0");
    header[124..136].copy_from_slice(b"00000000005\0");
    header[136..148].copy_from_slice(b"14424402220\0");
    header[148..156].copy_from_slice(b"        ");
    let sum: u32 = header.iter().map(|&b| u32::from(b)).sum();
    let field = format!("{:06o}\0 ", sum);
    header[148..156].copy_from_slice(field.as_bytes());
    header
}
