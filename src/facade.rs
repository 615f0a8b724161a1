//! High-level entry points.
//!
//! [`MimeTypeDetector`] wires a configuration, a pipeline and the lookup
//! repository around one file. [`MimeDetector`] adds the file-level helpers
//! applications tend to want next to the MIME type: a content hash, a data
//! URI and an icon class.

use crate::config::DetectorConfig;
use crate::detection::{DetectionContext, DetectorPipeline, MatchResult};
use crate::error::{MimeError, Result};
use crate::repository::MimeTypeRepository;
use base64::Engine as _;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Classifies one file at a time with a configurable pipeline.
#[derive(Debug)]
pub struct MimeTypeDetector {
    config: DetectorConfig,
    pipeline: DetectorPipeline,
    repository: MimeTypeRepository,
    context: DetectionContext,
}

impl MimeTypeDetector {
    /// Built-in detectors and the default configuration.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_config(path, DetectorConfig::default())
    }

    pub fn with_config<P: AsRef<Path>>(path: P, config: DetectorConfig) -> Result<Self> {
        let pipeline = DetectorPipeline::with_defaults(&config);
        Self::with_parts(path, config, pipeline, MimeTypeRepository::default())
    }

    /// Fully injected construction; the window is read immediately.
    pub fn with_parts<P: AsRef<Path>>(
        path: P,
        config: DetectorConfig,
        pipeline: DetectorPipeline,
        repository: MimeTypeRepository,
    ) -> Result<Self> {
        config.validate()?;
        let context = DetectionContext::from_path(path, config.window.max_length)?;
        Ok(Self {
            config,
            pipeline,
            repository,
            context,
        })
    }

    /// Point the detector at another file, discarding the previous result.
    pub fn detect_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Option<MatchResult>> {
        self.context = DetectionContext::from_path(path, self.config.window.max_length)?;
        Ok(self.file_type())
    }

    /// The (memoized) classification of the current file.
    pub fn file_type(&self) -> Option<MatchResult> {
        self.pipeline.detect(&self.context)
    }

    /// Detected extension, or `""` when nothing matched.
    pub fn file_extension(&self) -> String {
        self.file_type()
            .map(|m| m.extension().to_string())
            .unwrap_or_default()
    }

    /// Detected MIME type, or `""` when nothing matched.
    pub fn mime_type(&self) -> String {
        self.file_type()
            .map(|m| m.mime_type().to_string())
            .unwrap_or_default()
    }

    pub fn source(&self) -> Option<&Path> {
        self.context.source()
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &DetectorPipeline {
        &self.pipeline
    }

    pub fn repository(&self) -> &MimeTypeRepository {
        &self.repository
    }

    pub fn mime_types_for_extension(&self, extension: &str) -> &[String] {
        self.repository.mime_types_for_extension(extension)
    }

    pub fn extension_for_mime_type(&self, mime_type: &str) -> &str {
        self.repository.extension_for_mime_type(mime_type)
    }

    pub fn extensions_for_mime_type(&self, mime_type: &str) -> &[String] {
        self.repository.extensions_for_mime_type(mime_type)
    }
}

/// File-level convenience wrapper around [`MimeTypeDetector`].
#[derive(Debug)]
pub struct MimeDetector {
    path: PathBuf,
    file_hash: String,
    detector: MimeTypeDetector,
}

impl MimeDetector {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_config(path, DetectorConfig::default())
    }

    /// Validate the path, hash the file and read its byte window.
    pub fn with_config<P: AsRef<Path>>(path: P, config: DetectorConfig) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(MimeError::MissingFilePath);
        }
        if !path.is_file() {
            return Err(MimeError::FileDoesNotExist {
                path: path.to_path_buf(),
            });
        }

        let file_hash = sha256_file(path)?;
        debug!(path = %path.display(), hash = %file_hash, "hashed file");
        let detector = MimeTypeDetector::with_config(path, config)?;

        Ok(Self {
            path: path.to_path_buf(),
            file_hash,
            detector,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn detector(&self) -> &MimeTypeDetector {
        &self.detector
    }

    pub fn mime_type(&self) -> String {
        self.detector.mime_type()
    }

    pub fn file_extension(&self) -> String {
        self.detector.file_extension()
    }

    /// Lowercase hex SHA-256 of the whole file, computed at construction.
    pub fn file_hash(&self) -> &str {
        &self.file_hash
    }

    /// `data:<mime>;base64,<payload>` for the whole file.
    ///
    /// Empty when the type is unknown or the file is empty.
    pub fn base64_data_uri(&self) -> Result<String> {
        let mime_type = self.mime_type();
        if mime_type.is_empty() {
            return Ok(String::new());
        }
        let contents = fs::read(&self.path).map_err(|source| MimeError::FileNotReadable {
            path: self.path.clone(),
            source,
        })?;
        if contents.is_empty() {
            return Ok(String::new());
        }
        let payload = base64::engine::general_purpose::STANDARD.encode(contents);
        Ok(format!("data:{mime_type};base64,{payload}"))
    }

    /// Font Awesome 4 class for `mime_type`, or for the detected type when
    /// `None` or empty.
    pub fn font_awesome_icon(&self, mime_type: Option<&str>, fixed_width: bool) -> String {
        let detected;
        let mime = match mime_type {
            Some(mime) if !mime.is_empty() => mime,
            _ => {
                detected = self.mime_type();
                detected.as_str()
            }
        };
        font_awesome_class(mime, fixed_width)
    }
}

/// Icon class for a MIME type; image, audio and video get dedicated icons.
pub fn font_awesome_class(mime_type: &str, fixed_width: bool) -> String {
    let icon = if mime_type.contains("image") {
        "fa-file-image-o"
    } else if mime_type.contains("audio") {
        "fa-file-audio-o"
    } else if mime_type.contains("video") {
        "fa-file-video-o"
    } else {
        "fa-file-o"
    };
    if fixed_width {
        format!("fa {icon} fa-fw")
    } else {
        format!("fa {icon}")
    }
}

/// Streamed SHA-256 of a file as lowercase hex.
pub fn sha256_file(path: &Path) -> Result<String> {
    let hash_error = |source: io::Error| MimeError::UnableToHash {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(hash_error)?;
    let mut hasher = Sha256::new();
    io::copy(&mut BufReader::new(file), &mut hasher).map_err(hash_error)?;
    Ok(hex::encode(hasher.finalize()))
}
