//! Bounded byte window and the matching primitives evaluated against it.
//!
//! A window is filled once from the head of a file (or any reader) and is
//! immutable afterwards. Every lookup is bounds-checked: reading past the
//! captured prefix is a non-match, never a panic or an error.

use crate::config::check_window_length;
use crate::error::{MimeError, Result};
use bytes::Bytes;
use memchr::memmem;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// Bounded, read-once prefix of an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteWindow {
    data: Bytes,
    max_length: usize,
}

impl ByteWindow {
    /// Read at most `max_length` leading bytes of the file at `path`.
    pub fn from_path<P: AsRef<Path>>(path: P, max_length: usize) -> Result<Self> {
        let path = path.as_ref();
        check_window_length(max_length)?;
        if path.as_os_str().is_empty() {
            return Err(MimeError::MissingFilePath);
        }

        let not_readable = |source: io::Error| MimeError::FileNotReadable {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(not_readable)?;
        let data = read_prefix(file, max_length).map_err(not_readable)?;

        debug!(
            path = %path.display(),
            window_len = data.len(),
            max_length,
            "byte window filled"
        );
        Ok(Self {
            data: Bytes::from(data),
            max_length,
        })
    }

    /// Read at most `max_length` bytes from an arbitrary reader.
    pub fn from_reader<R: Read>(reader: R, max_length: usize) -> Result<Self> {
        check_window_length(max_length)?;
        let data = read_prefix(reader, max_length)?;
        Ok(Self {
            data: Bytes::from(data),
            max_length,
        })
    }

    /// Capture an in-memory buffer, truncated to `max_length`.
    pub fn from_bytes(data: impl Into<Bytes>, max_length: usize) -> Result<Self> {
        check_window_length(max_length)?;
        let mut data: Bytes = data.into();
        data.truncate(max_length);
        Ok(Self { data, max_length })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Single byte at `offset`, if captured.
    pub fn get(&self, offset: usize) -> Option<u8> {
        self.data.get(offset).copied()
    }

    /// `len` bytes starting at `offset`, only when all of them are captured.
    pub fn slice(&self, offset: usize, len: usize) -> Option<&[u8]> {
        let end = offset.checked_add(len)?;
        self.data.get(offset..end)
    }

    /// Little-endian u32 at `offset`.
    pub fn read_u32_le(&self, offset: usize) -> Option<u32> {
        let raw = self.slice(offset, 4)?;
        Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }

    /// True iff `pattern` occurs verbatim at `offset`.
    ///
    /// An empty pattern or an empty window never matches.
    pub fn check_for_bytes(&self, pattern: &[u8], offset: usize) -> bool {
        if pattern.is_empty() || self.data.is_empty() {
            return false;
        }
        self.slice(offset, pattern.len()) == Some(pattern)
    }

    /// Masked variant: byte `i` matches when `pattern[i] == mask[i] & window[offset + i]`.
    ///
    /// A mask shorter than the pattern never matches.
    pub fn check_for_bytes_masked(&self, pattern: &[u8], offset: usize, mask: &[u8]) -> bool {
        if pattern.is_empty() || self.data.is_empty() || mask.len() < pattern.len() {
            return false;
        }
        match self.slice(offset, pattern.len()) {
            Some(actual) => pattern
                .iter()
                .zip(mask)
                .zip(actual)
                .all(|((&expected, &m), &byte)| expected == m & byte),
            None => false,
        }
    }

    /// First offset in `start..len - pattern.len()` (exclusive) where the
    /// pattern occurs.
    pub fn search_for_bytes(&self, pattern: &[u8], start: usize) -> Option<usize> {
        let limit = self.search_limit(pattern)?;
        if pattern.is_empty() || start >= limit {
            return None;
        }
        // Candidates end at `limit - 1 + pattern.len()`, i.e. one byte short
        // of the window end.
        let haystack = &self.data[start..self.data.len() - 1];
        memmem::find(haystack, pattern).map(|pos| start + pos)
    }

    /// Masked forward search over the same range as [`Self::search_for_bytes`].
    pub fn search_for_bytes_masked(
        &self,
        pattern: &[u8],
        start: usize,
        mask: &[u8],
    ) -> Option<usize> {
        let limit = self.search_limit(pattern)?;
        (start..limit).find(|&offset| self.check_for_bytes_masked(pattern, offset, mask))
    }

    fn search_limit(&self, pattern: &[u8]) -> Option<usize> {
        self.data.len().checked_sub(pattern.len())
    }

    /// `check_for_bytes` over the byte encoding of `literal`.
    pub fn check_string(&self, literal: &str, offset: usize) -> bool {
        self.check_for_bytes(literal.as_bytes(), offset)
    }

    /// Match an ASCII literal stored as UTF-16LE (`c, 0x00` per character).
    pub fn check_utf16le(&self, literal: &str, offset: usize) -> bool {
        self.check_for_bytes(&utf16le_literal(literal), offset)
    }

    /// Match an ASCII literal stored as UTF-16BE (`0x00, c` per character).
    pub fn check_utf16be(&self, literal: &str, offset: usize) -> bool {
        self.check_for_bytes(&utf16be_literal(literal), offset)
    }

    /// Expose a byte range as text, one char per byte.
    ///
    /// Bytes map to the code point of the same value, so the text is
    /// lossless and ASCII substring checks behave as on the raw bytes.
    /// Ranges past the window are clamped.
    pub fn slice_as_text(&self, offset: usize, len: Option<usize>) -> String {
        let start = offset.min(self.data.len());
        let end = match len {
            Some(len) => start.saturating_add(len).min(self.data.len()),
            None => self.data.len(),
        };
        self.data[start..end].iter().map(|&b| char::from(b)).collect()
    }
}

/// Build the UTF-16LE byte sequence of an ASCII literal.
pub fn utf16le_literal(literal: &str) -> Vec<u8> {
    literal.bytes().flat_map(|b| [b, 0x00]).collect()
}

/// Build the UTF-16BE byte sequence of an ASCII literal.
pub fn utf16be_literal(literal: &str) -> Vec<u8> {
    literal.bytes().flat_map(|b| [0x00, b]).collect()
}

fn read_prefix<R: Read>(reader: R, max_length: usize) -> io::Result<Vec<u8>> {
    let mut data = Vec::with_capacity(max_length.min(64 * 1024));
    reader.take(max_length as u64).read_to_end(&mut data)?;
    Ok(data)
}
