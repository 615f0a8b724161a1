//! Archive listing capability used by the ZIP disambiguation detector.
//!
//! A [`ContainerReader`] opens a file as an archive and hands back a
//! [`ContainerListing`] that can read named entries and probe for their
//! presence. Every failure surfaces as `None`/`false`; the caller then falls
//! back to scanning the byte window. Listings close when dropped.

use std::fmt;
use std::path::Path;

/// Upper bound on the bytes read from a single entry.
pub const MAX_ENTRY_BYTES: u64 = 1024 * 1024;

/// Opens archives for directory-aware inspection.
pub trait ContainerReader: Send + Sync + fmt::Debug {
    /// Open `path` as an archive, or `None` when it cannot be listed.
    fn open(&self, path: &Path) -> Option<Box<dyn ContainerListing>>;

    /// Whether this reader can ever open anything.
    fn is_available(&self) -> bool {
        true
    }
}

/// An opened archive.
pub trait ContainerListing {
    /// Contents of the entry called exactly `name`, capped at [`MAX_ENTRY_BYTES`].
    fn entry(&mut self, name: &str) -> Option<Vec<u8>>;

    fn has_entry(&self, name: &str, case_insensitive: bool) -> bool;
}

/// Reader that never opens anything, forcing the raw-scan path.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableReader;

impl ContainerReader for UnavailableReader {
    fn open(&self, _path: &Path) -> Option<Box<dyn ContainerListing>> {
        None
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Match `name` against a set of entry names, optionally ignoring ASCII case.
pub fn contains_name<'a, I>(names: I, name: &str, case_insensitive: bool) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().any(|candidate| {
        if case_insensitive {
            candidate.eq_ignore_ascii_case(name)
        } else {
            candidate == name
        }
    })
}

#[cfg(feature = "containers")]
mod zip_reader {
    use super::{contains_name, ContainerListing, ContainerReader, MAX_ENTRY_BYTES};
    use std::fs::File;
    use std::io::{BufReader, Read};
    use std::path::Path;
    use tracing::debug;
    use zip::ZipArchive;

    /// Reads archives through the `zip` crate's central directory parser.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct ZipContainerReader;

    struct ZipListing {
        archive: ZipArchive<BufReader<File>>,
    }

    impl ContainerReader for ZipContainerReader {
        fn open(&self, path: &Path) -> Option<Box<dyn ContainerListing>> {
            let file = match File::open(path) {
                Ok(file) => file,
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "container open failed");
                    return None;
                }
            };
            match ZipArchive::new(BufReader::new(file)) {
                Ok(archive) => Some(Box::new(ZipListing { archive })),
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "not a readable zip archive");
                    None
                }
            }
        }
    }

    impl ContainerListing for ZipListing {
        fn entry(&mut self, name: &str) -> Option<Vec<u8>> {
            let file = self.archive.by_name(name).ok()?;
            let mut data = Vec::new();
            match file.take(MAX_ENTRY_BYTES).read_to_end(&mut data) {
                Ok(_) => Some(data),
                Err(err) => {
                    debug!(entry = name, error = %err, "zip entry unreadable");
                    None
                }
            }
        }

        fn has_entry(&self, name: &str, case_insensitive: bool) -> bool {
            contains_name(self.archive.file_names(), name, case_insensitive)
        }
    }
}

#[cfg(feature = "containers")]
pub use zip_reader::ZipContainerReader;

/// The best reader compiled into this build.
pub fn default_reader() -> Box<dyn ContainerReader> {
    #[cfg(feature = "containers")]
    {
        Box::new(ZipContainerReader)
    }
    #[cfg(not(feature = "containers"))]
    {
        Box::new(UnavailableReader)
    }
}
