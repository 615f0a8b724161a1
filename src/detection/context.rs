//! Per-request detection state.

use super::result::MatchResult;
use super::window::ByteWindow;
use crate::error::Result;
use std::cell::OnceCell;
use std::path::{Path, PathBuf};

/// Binds a byte window to the file it came from and memoizes the first
/// successful classification.
///
/// A context belongs to a single classification request; it is not meant
/// to be shared across threads.
#[derive(Debug)]
pub struct DetectionContext {
    source: Option<PathBuf>,
    window: ByteWindow,
    result: OnceCell<MatchResult>,
}

impl DetectionContext {
    pub fn new(source: Option<PathBuf>, window: ByteWindow) -> Self {
        Self {
            source,
            window,
            result: OnceCell::new(),
        }
    }

    /// Open `path` and capture its first `max_length` bytes.
    pub fn from_path<P: AsRef<Path>>(path: P, max_length: usize) -> Result<Self> {
        let path = path.as_ref();
        let window = ByteWindow::from_path(path, max_length)?;
        Ok(Self::new(Some(path.to_path_buf()), window))
    }

    /// Context over in-memory bytes with no backing file.
    pub fn from_window(window: ByteWindow) -> Self {
        Self::new(None, window)
    }

    /// Path of the file under analysis, when there is one.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn window(&self) -> &ByteWindow {
        &self.window
    }

    /// Store the result; a second call keeps the first value.
    pub fn remember(&self, result: MatchResult) -> &MatchResult {
        self.result.get_or_init(|| result)
    }

    pub fn remembered(&self) -> Option<&MatchResult> {
        self.result.get()
    }
}
