//! Error types for the mimeprobe detection engine.
//!
//! Only setup and I/O failures are errors. A file that no detector
//! recognises is reported as `None`, never through this type.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for mimeprobe operations.
#[derive(Debug, Error)]
pub enum MimeError {
    /// An empty path was handed to a component that needs a file.
    #[error("No file provided.")]
    MissingFilePath,

    /// The path does not point to an existing regular file.
    #[error("File '{}' does not exist.", path.display())]
    FileDoesNotExist { path: PathBuf },

    /// The file exists but could not be opened or read.
    #[error("File '{}' is not readable.", path.display())]
    FileNotReadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The byte window cap is below the viable minimum.
    #[error("Maximum byte window length \"{length}\" must not be smaller than {minimum}.")]
    InvalidWindowLength { length: usize, minimum: usize },

    /// The file hash could not be computed.
    #[error("Unable to calculate the hash for '{}'.", path.display())]
    UnableToHash {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration document could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for mimeprobe operations
pub type Result<T> = std::result::Result<T, MimeError>;

impl MimeError {
    /// True for the configuration family (window cap, config document).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            MimeError::InvalidWindowLength { .. }
                | MimeError::InvalidConfiguration(_)
        )
    }
}
