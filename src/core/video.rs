//! # Pending Video
//!
//! The at-most-one file staged for upload. Selection is validated before it
//! ever reaches the network: only `video/*` MIME types, and nothing past the
//! upload ceiling the backend enforces. A new selection replaces the old one
//! wholesale; there is never more than one staged file.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Hard upload ceiling, matching the backend's MAX_CONTENT_LENGTH (100 MB).
pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

/// Why a file was refused as an upload candidate.
#[derive(Debug, PartialEq, Eq)]
pub enum AttachError {
    /// MIME type (guessed from the extension) is not `video/*`.
    NotAVideo(String),
    /// File exceeds [`MAX_UPLOAD_BYTES`]; carries the actual size.
    TooLarge(u64),
    /// Path does not exist, is not a regular file, or cannot be read.
    Unreadable(String),
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachError::NotAVideo(mime) => {
                write!(f, "Please choose a video file (got {mime})")
            }
            AttachError::TooLarge(size) => write!(
                f,
                "File is {} — the limit is {}",
                crate::core::conversation::format_size(*size),
                crate::core::conversation::format_size(MAX_UPLOAD_BYTES),
            ),
            AttachError::Unreadable(msg) => write!(f, "Cannot read file: {msg}"),
        }
    }
}

impl std::error::Error for AttachError {}

/// A validated video file staged for the next send.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingVideo {
    pub path: PathBuf,
    pub display_name: String,
    pub size_bytes: u64,
    pub mime: String,
}

impl PendingVideo {
    /// Validate raw file attributes without touching the filesystem.
    /// Split out from [`from_path`](Self::from_path) so the acceptance rules
    /// are testable against exact sizes and MIME strings.
    pub fn validate(mime: &str, size_bytes: u64) -> Result<(), AttachError> {
        if !mime.starts_with("video/") {
            return Err(AttachError::NotAVideo(mime.to_string()));
        }
        if size_bytes > MAX_UPLOAD_BYTES {
            return Err(AttachError::TooLarge(size_bytes));
        }
        Ok(())
    }

    /// Inspect a path and stage it as the pending upload.
    ///
    /// The MIME type is guessed from the file extension — the same signal a
    /// browser file input would report for the common video containers.
    pub fn from_path(path: &Path) -> Result<Self, AttachError> {
        let meta = fs::metadata(path).map_err(|e| AttachError::Unreadable(e.to_string()))?;
        if !meta.is_file() {
            return Err(AttachError::Unreadable("not a regular file".to_string()));
        }

        let mime = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self::validate(&mime, meta.len())?;

        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            path: path.to_path_buf(),
            display_name,
            size_bytes: meta.len(),
            mime,
        })
    }
}
