//! Ordered, first-match-wins detector pipeline.

use super::context::DetectionContext;
use super::registry::DetectorRegistry;
use super::result::MatchResult;
use crate::config::DetectorConfig;
use crate::detectors::{default_detectors, SignatureDetector};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Sequence of detectors queried in order until one recognises the input.
#[derive(Clone, Default)]
pub struct DetectorPipeline {
    detectors: Vec<Arc<dyn SignatureDetector>>,
}

impl DetectorPipeline {
    pub fn new(detectors: Vec<Arc<dyn SignatureDetector>>) -> Self {
        Self { detectors }
    }

    /// Built-in detectors only, configured from `config`.
    pub fn with_defaults(config: &DetectorConfig) -> Self {
        Self::new(default_detectors(config))
    }

    /// Registered extensions (already priority-sorted) followed by the
    /// built-in detectors.
    pub fn with_registry(registry: &DetectorRegistry, config: &DetectorConfig) -> Self {
        let mut detectors = registry.resolve();
        detectors.extend(default_detectors(config));
        Self::new(detectors)
    }

    pub fn push(&mut self, detector: Arc<dyn SignatureDetector>) {
        self.detectors.push(detector);
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Detector names in query order.
    pub fn names(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Classify the context's window.
    ///
    /// A result already memoized in the context is returned without running
    /// any detector. Otherwise the first match is memoized and returned; a
    /// miss leaves the context empty so a later call runs the pipeline again.
    pub fn detect(&self, context: &DetectionContext) -> Option<MatchResult> {
        if let Some(hit) = context.remembered() {
            trace!(result = %hit, "returning memoized result");
            return Some(hit.clone());
        }

        for detector in &self.detectors {
            trace!(detector = detector.name(), "probing");
            if let Some(hit) = detector.detect(context) {
                debug!(
                    detector = detector.name(),
                    extension = hit.extension(),
                    mime = hit.mime_type(),
                    "signature matched"
                );
                return Some(context.remember(hit).clone());
            }
        }

        debug!(
            window_len = context.window().len(),
            detectors = self.detectors.len(),
            "no detector matched"
        );
        None
    }
}

impl fmt::Debug for DetectorPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectorPipeline")
            .field("detectors", &self.names())
            .finish()
    }
}
