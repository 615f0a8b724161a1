//! Owned registry of externally supplied detectors.
//!
//! Extensions are kept sorted by priority (descending) and then by
//! registration order (ascending). The registry is a plain value: callers
//! own it, mutate it from one place, and hand it to a pipeline once stable.

use crate::detectors::SignatureDetector;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Factory that yields the detectors of one extension when a pipeline is built.
pub type DetectorFactory = Box<dyn Fn() -> Vec<Arc<dyn SignatureDetector>> + Send + Sync>;

/// How an extension supplies its detectors.
pub enum DetectorSource {
    /// A ready detector instance.
    Instance(Arc<dyn SignatureDetector>),
    /// A factory invoked at resolution time. It must yield at least one detector.
    Factory(DetectorFactory),
}

impl DetectorSource {
    pub fn factory<F>(factory: F) -> Self
    where
        F: Fn() -> Vec<Arc<dyn SignatureDetector>> + Send + Sync + 'static,
    {
        DetectorSource::Factory(Box::new(factory))
    }
}

impl<D: SignatureDetector + 'static> From<D> for DetectorSource {
    fn from(detector: D) -> Self {
        DetectorSource::Instance(Arc::new(detector))
    }
}

impl From<Arc<dyn SignatureDetector>> for DetectorSource {
    fn from(detector: Arc<dyn SignatureDetector>) -> Self {
        DetectorSource::Instance(detector)
    }
}

struct Extension {
    name: String,
    source: DetectorSource,
    priority: i32,
    index: u64,
}

/// Named detector extensions with deterministic ordering.
#[derive(Default)]
pub struct DetectorRegistry {
    extensions: Vec<Extension>,
    next_index: u64,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the extension `name`.
    ///
    /// Higher priorities run first; equal priorities run in registration
    /// order. Replacing a name counts as a fresh registration.
    pub fn extend(
        &mut self,
        name: impl Into<String>,
        source: impl Into<DetectorSource>,
        priority: i32,
    ) {
        let name = name.into();
        self.extensions.retain(|ext| ext.name != name);
        debug!(extension = %name, priority, "registering detector extension");

        self.extensions.push(Extension {
            name,
            source: source.into(),
            priority,
            index: self.next_index,
        });
        self.next_index += 1;
        // stable, and keys are unique anyway thanks to `index`
        self.extensions
            .sort_by(|a, b| b.priority.cmp(&a.priority).then(a.index.cmp(&b.index)));
    }

    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| ext.name == name)
    }

    /// Drop the extension `name`; returns whether it existed.
    pub fn forget_extension(&mut self, name: &str) -> bool {
        let before = self.extensions.len();
        self.extensions.retain(|ext| ext.name != name);
        before != self.extensions.len()
    }

    /// Remove every extension and restart registration numbering.
    pub fn flush_extensions(&mut self) {
        self.extensions.clear();
        self.next_index = 0;
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Extension names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.extensions.iter().map(|ext| ext.name.as_str()).collect()
    }

    /// Materialize every extension's detectors in execution order.
    ///
    /// A factory that yields nothing contributes no detectors.
    pub fn resolve(&self) -> Vec<Arc<dyn SignatureDetector>> {
        let mut detectors = Vec::new();
        for ext in &self.extensions {
            match &ext.source {
                DetectorSource::Instance(detector) => detectors.push(Arc::clone(detector)),
                DetectorSource::Factory(factory) => {
                    let produced = factory();
                    if produced.is_empty() {
                        debug!(extension = %ext.name, "factory yielded no detectors");
                    }
                    detectors.extend(produced);
                }
            }
        }
        detectors
    }
}

impl fmt::Debug for DetectorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectorRegistry")
            .field("extensions", &self.names())
            .field("next_index", &self.next_index)
            .finish()
    }
}
