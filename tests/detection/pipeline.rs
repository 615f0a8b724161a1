//! Pipeline ordering, memoization and degenerate inputs.

use crate::common::{classify_bytes, pair, write_fixture};
use mimeprobe::{
    ByteWindow, DetectionContext, DetectorCategory, DetectorConfig, DetectorPipeline,
    DetectorRegistry, DetectorSource, MatchResult, MimeError, SignatureDetector,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const PNG: &[u8] = b"\x89PNG\r\n\x1A\n\x00\x00\x00\x0DIHDR";

/// Claims every input and counts how often it was asked.
struct Claim {
    name: &'static str,
    calls: Arc<AtomicUsize>,
}

impl Claim {
    fn new(name: &'static str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                name,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl SignatureDetector for Claim {
    fn name(&self) -> &str {
        self.name
    }

    fn detect(&self, _context: &DetectionContext) -> Option<MatchResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Some(MatchResult::new(self.name, "application/x-claimed"))
    }
}

/// Appends its name to a shared log, then matches or not.
struct Recorder {
    name: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
    matches: bool,
}

impl Recorder {
    fn new(name: &'static str, log: &Arc<Mutex<Vec<&'static str>>>, matches: bool) -> Self {
        Self {
            name,
            log: Arc::clone(log),
            matches,
        }
    }
}

impl SignatureDetector for Recorder {
    fn name(&self) -> &str {
        self.name
    }

    fn detect(&self, _context: &DetectionContext) -> Option<MatchResult> {
        self.log.lock().unwrap().push(self.name);
        self.matches.then(|| MatchResult::new(self.name, "application/x-recorded"))
    }
}

fn context(bytes: &[u8]) -> DetectionContext {
    DetectionContext::from_window(ByteWindow::from_bytes(bytes.to_vec(), 4096).unwrap())
}

#[test]
fn test_repeated_detection_is_idempotent() {
    let pipeline = DetectorPipeline::with_defaults(&DetectorConfig::default());
    let ctx = context(PNG);
    let first = pipeline.detect(&ctx);
    let second = pipeline.detect(&ctx);
    assert_eq!(first, second);
    assert_eq!(first.map(MatchResult::into_parts), pair("png", "image/png"));
}

#[test]
fn test_memoized_match_runs_no_detector() {
    let (claim, calls) = Claim::new("claim");
    let mut registry = DetectorRegistry::new();
    registry.extend("claim", claim, 0);
    let pipeline = DetectorPipeline::with_registry(&registry, &DetectorConfig::default());

    let ctx = context(b"anything");
    for _ in 0..3 {
        assert_eq!(pipeline.detect(&ctx).unwrap().extension(), "claim");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_registered_detectors_precede_builtins() {
    let (low, _) = Claim::new("low");
    let (high, _) = Claim::new("high");
    let (tie, _) = Claim::new("tie");

    let mut registry = DetectorRegistry::new();
    registry.extend("low", low, 1);
    registry.extend("high", high, 10);
    registry.extend("tie", tie, 10);
    assert_eq!(registry.names(), vec!["high", "tie", "low"]);

    let pipeline = DetectorPipeline::with_registry(&registry, &DetectorConfig::default());
    let names = pipeline.names();
    assert_eq!(&names[..4], &["high", "tie", "low", "image"]);

    // a PNG would match the image detector, but extensions come first
    assert_eq!(pipeline.detect(&context(PNG)).unwrap().extension(), "high");
}

#[test]
fn test_reregistration_moves_to_the_back_of_its_priority() {
    let mut registry = DetectorRegistry::new();
    registry.extend("a", Claim::new("a").0, 5);
    registry.extend("b", Claim::new("b").0, 5);
    registry.extend("a", Claim::new("a").0, 5);
    assert_eq!(registry.names(), vec!["b", "a"]);

    assert!(registry.forget_extension("b"));
    assert!(!registry.has_extension("b"));
    registry.flush_extensions();
    assert!(registry.is_empty());
}

#[test]
fn test_factory_extensions() {
    let mut registry = DetectorRegistry::new();
    registry.extend(
        "pair",
        DetectorSource::factory(|| {
            let detectors: Vec<Arc<dyn SignatureDetector>> =
                vec![Arc::new(Claim::new("first").0), Arc::new(Claim::new("second").0)];
            detectors
        }),
        0,
    );
    let pipeline = DetectorPipeline::with_registry(&registry, &DetectorConfig::default());
    assert_eq!(&pipeline.names()[..2], &["first", "second"]);
}

#[test]
fn test_empty_factory_contributes_nothing() {
    let mut registry = DetectorRegistry::new();
    registry.extend("hollow", DetectorSource::factory(Vec::new), 0);
    let pipeline = DetectorPipeline::with_registry(&registry, &DetectorConfig::default());
    let builtins = DetectorPipeline::with_defaults(&DetectorConfig::default());
    assert_eq!(pipeline.names(), builtins.names());
    assert_eq!(pipeline.detect(&context(PNG)).unwrap().extension(), "png");
}

#[test]
fn test_higher_priority_miss_still_runs_first() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut registry = DetectorRegistry::new();
    registry.extend("low", Recorder::new("low", &log, true), 1);
    registry.extend("high", Recorder::new("high", &log, false), 10);

    let pipeline = DetectorPipeline::with_registry(&registry, &DetectorConfig::default());
    let found = pipeline.detect(&context(PNG)).unwrap();

    assert_eq!(found.extension(), "low");
    assert_eq!(*log.lock().unwrap(), vec!["high", "low"]);
}

#[test]
fn test_zero_length_window_matches_nothing() {
    assert_eq!(classify_bytes(b""), None);

    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "empty.bin", b"");
    let ctx = DetectionContext::from_path(&path, 4096).unwrap();
    assert!(ctx.window().is_empty());
    assert!(DetectorPipeline::with_defaults(&DetectorConfig::default())
        .detect(&ctx)
        .is_none());
}

#[test]
fn test_tiny_windows_do_not_panic() {
    let pipeline = DetectorPipeline::with_defaults(&DetectorConfig::default());
    for len in 1..=16 {
        for fill in [0x00u8, 0xFF, b'<', b'P', 0x1F] {
            let ctx = context(&vec![fill; len]);
            let _ = pipeline.detect(&ctx);
        }
    }
}

#[test]
fn test_custom_detector_category_defaults() {
    let (claim, _) = Claim::new("claim");
    assert_eq!(claim.category(), DetectorCategory::Custom);
}

#[test]
fn test_missing_file_is_an_error_not_a_miss() {
    let dir = TempDir::new().unwrap();
    let err = DetectionContext::from_path(dir.path().join("absent.bin"), 4096).unwrap_err();
    assert!(matches!(err, MimeError::FileNotReadable { .. }));
}
