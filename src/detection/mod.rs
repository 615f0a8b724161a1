//! Signature detection runtime.
//!
//! A [`ByteWindow`] captures the head of a file, a [`DetectionContext`]
//! binds it to the source and memoizes the outcome, and a
//! [`DetectorPipeline`] walks the detectors until one reports a
//! [`MatchResult`].

pub mod context;
pub mod pipeline;
pub mod registry;
pub mod result;
pub mod window;

pub use context::DetectionContext;
pub use pipeline::DetectorPipeline;
pub use registry::{DetectorFactory, DetectorRegistry, DetectorSource};
pub use result::MatchResult;
pub use window::{utf16be_literal, utf16le_literal, ByteWindow};
