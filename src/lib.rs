//! Identify file formats from their leading bytes.
//!
//! A bounded [`ByteWindow`] is read from the head of a file and handed to a
//! [`DetectorPipeline`] of [`SignatureDetector`]s; the first detector that
//! recognises a signature yields a [`MatchResult`] (extension and MIME
//! type). Filenames and metadata are never consulted.
//!
//! ```no_run
//! use mimeprobe::MimeTypeDetector;
//!
//! let detector = MimeTypeDetector::from_path("photo.bin")?;
//! println!("{}", detector.mime_type());
//! # Ok::<(), mimeprobe::MimeError>(())
//! ```

/// Configuration types
pub mod config;
/// Archive listing capability for ZIP disambiguation
pub mod containers;
/// Byte window, context, pipeline and extension registry
pub mod detection;
/// Built-in signature detectors
pub mod detectors;
/// Error types
pub mod error;
/// High-level file detectors
pub mod facade;
/// Tracing setup helpers
pub mod logging;
/// Extension and MIME type lookup
pub mod repository;

pub use config::{ContainerConfig, DetectorConfig, WindowConfig};
pub use detection::{
    ByteWindow, DetectionContext, DetectorFactory, DetectorPipeline, DetectorRegistry,
    DetectorSource, MatchResult,
};
pub use detectors::{DetectorCategory, SignatureDetector};
pub use error::{MimeError, Result};
pub use facade::{MimeDetector, MimeTypeDetector};
pub use repository::MimeTypeRepository;
