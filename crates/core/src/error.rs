//! Error types for the rentvault pipeline
//!
//! One shared error enum covers the store seams and the orchestration
//! layers. We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.

use std::io;
use thiserror::Error;

/// Result type alias for rentvault operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the backup and import pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// Record store (relational) operation failed
    #[error("record store error: {0}")]
    RecordStore(String),

    /// Blob store operation failed
    #[error("blob store error: {0}")]
    BlobStore(String),

    /// Snapshot catalog operation failed
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Requested snapshot or object does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller supplied an unusable input (bad archive, missing required file)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Archive build or extraction failed
    #[error("archive error: {0}")]
    Archive(String),

    /// I/O error (file operations, streams)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a record store error
    pub fn record_store(msg: impl Into<String>) -> Self {
        Self::RecordStore(msg.into())
    }

    /// Create a blob store error
    pub fn blob_store(msg: impl Into<String>) -> Self {
        Self::BlobStore(msg.into())
    }

    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid-input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an archive error
    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }

    /// Whether this error should map to a 404-style response
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
