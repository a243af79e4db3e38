//! Archive error types

use std::io;
use thiserror::Error;

/// Errors that can occur while building or reading an archive
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Invalid archive structure
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// Required file missing from archive
    #[error("missing required file in archive: {0}")]
    MissingFile(String),

    /// Unsupported manifest format version
    #[error("unsupported archive format version: {version}")]
    UnsupportedVersion {
        /// The unsupported version number
        version: u32,
    },

    /// Tar-level operation failed
    #[error("archive error: {0}")]
    Archive(String),

    /// Compression/decompression failed
    #[error("compression error: {0}")]
    Compression(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ArchiveError {
    /// Create a tar-level error
    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }

    /// Create a compression error
    pub fn compression(msg: impl Into<String>) -> Self {
        Self::Compression(msg.into())
    }

    /// Create an invalid-archive error
    pub fn invalid_archive(msg: impl Into<String>) -> Self {
        Self::InvalidArchive(msg.into())
    }

    /// Create a missing-file error
    pub fn missing_file(path: impl Into<String>) -> Self {
        Self::MissingFile(path.into())
    }
}

/// Result type for archive operations
pub type ArchiveResult<T> = Result<T, ArchiveError>;
