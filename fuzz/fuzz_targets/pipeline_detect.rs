#![no_main]
use libfuzzer_sys::fuzz_target;
use mimeprobe::{ByteWindow, DetectionContext, DetectorConfig, DetectorPipeline};

fuzz_target!(|data: &[u8]| {
    let config = DetectorConfig::default();
    if let Ok(window) = ByteWindow::from_bytes(data.to_vec(), config.window.max_length) {
        let context = DetectionContext::from_window(window);
        let _ = DetectorPipeline::with_defaults(&config).detect(&context);
    }
});
