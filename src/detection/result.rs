//! Detection outcome value type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical `(extension, MIME type)` pair produced by a detector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchResult {
    extension: String,
    mime_type: String,
}

impl MatchResult {
    pub fn new(extension: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn into_parts(self) -> (String, String) {
        (self.extension, self.mime_type)
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.mime_type, self.extension)
    }
}
