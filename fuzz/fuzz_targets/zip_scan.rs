#![no_main]
use libfuzzer_sys::fuzz_target;
use mimeprobe::detectors::ZipSignatureDetector;
use mimeprobe::{ByteWindow, DetectionContext, SignatureDetector};

fuzz_target!(|data: &[u8]| {
    let mut bytes = b"PK\x03\x04".to_vec();
    bytes.extend_from_slice(data);
    if let Ok(window) = ByteWindow::from_bytes(bytes, 4096) {
        let _ = ZipSignatureDetector::unavailable().detect(&DetectionContext::from_window(window));
    }
});
