//! Configuration for the detection engine.
//!
//! Settings are plain serde structs with defaults, so they can be built in
//! code or loaded from a JSON document before any file is opened.

use crate::error::{MimeError, Result};
use serde::{Deserialize, Serialize};

/// Smallest byte window the engine accepts.
pub const MIN_WINDOW_LENGTH: usize = 4;

/// Default byte window cap. Empirically tuned, not an algorithmic invariant.
pub const DEFAULT_WINDOW_LENGTH: usize = 4096;

/// Master configuration for a detector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Byte window sizing.
    pub window: WindowConfig,
    /// Container (ZIP) inspection settings.
    pub containers: ContainerConfig,
}

impl DetectorConfig {
    /// Parse a JSON document; absent fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| MimeError::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        self.window.validate()
    }

    /// Builder-style override of the window cap.
    pub fn with_max_window_length(mut self, max_length: usize) -> Result<Self> {
        self.window.set_max_length(max_length)?;
        Ok(self)
    }
}

/// Byte window configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Maximum number of leading bytes read from a file (default: 4096).
    pub max_length: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_WINDOW_LENGTH,
        }
    }
}

impl WindowConfig {
    pub fn validate(&self) -> Result<()> {
        check_window_length(self.max_length)
    }

    pub fn set_max_length(&mut self, max_length: usize) -> Result<()> {
        check_window_length(max_length)?;
        self.max_length = max_length;
        Ok(())
    }
}

/// Settings for the ZIP disambiguation detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Open archives through the container reader before falling back to
    /// a raw scan of the byte window (default: true).
    pub use_archive_reader: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            use_archive_reader: true,
        }
    }
}

pub(crate) fn check_window_length(max_length: usize) -> Result<()> {
    if max_length < MIN_WINDOW_LENGTH {
        return Err(MimeError::InvalidWindowLength {
            length: max_length,
            minimum: MIN_WINDOW_LENGTH,
        });
    }
    Ok(())
}
