//! Snapshot catalog API
//!
//! Lifecycle operations over catalog rows, for callers that manage
//! snapshots without touching archive internals.

use rentvault_core::{BlobStore, Error, Result, Snapshot, SnapshotCatalog, SnapshotId};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Validity window of generated download URLs
pub const DOWNLOAD_URL_TTL: Duration = Duration::from_secs(60 * 60);

/// What a caller needs to fetch one archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadInfo {
    /// Time-limited signed URL
    pub download_url: String,
    /// Archive file name
    pub file_name: String,
    /// Archive size in bytes, if recorded
    pub size_bytes: Option<u64>,
}

/// Read/delete surface over the snapshot catalog
pub struct SnapshotIndex {
    catalog: Arc<dyn SnapshotCatalog>,
    blobs: Arc<dyn BlobStore>,
    archive_container: String,
}

impl SnapshotIndex {
    pub fn new(
        catalog: Arc<dyn SnapshotCatalog>,
        blobs: Arc<dyn BlobStore>,
        archive_container: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            blobs,
            archive_container: archive_container.into(),
        }
    }

    /// All catalog rows, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog read fails.
    pub fn list(&self) -> Result<Vec<Snapshot>> {
        self.catalog.list()
    }

    /// Signed download URL for a snapshot's archive
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the id is unknown or its archive
    /// blob is missing.
    pub fn download_url(&self, id: SnapshotId) -> Result<DownloadInfo> {
        let snapshot = self
            .catalog
            .get(id)?
            .ok_or_else(|| Error::not_found(format!("snapshot {}", id)))?;

        let download_url = self.blobs.signed_url(
            &self.archive_container,
            &snapshot.file_name,
            DOWNLOAD_URL_TTL,
        )?;

        Ok(DownloadInfo {
            download_url,
            file_name: snapshot.file_name,
            size_bytes: snapshot.size_bytes,
        })
    }

    /// Delete a snapshot: archive blob first, then the catalog row
    ///
    /// A blob-delete failure is logged and the row is still removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the id is unknown, or an error if
    /// the catalog delete fails.
    pub fn delete(&self, id: SnapshotId) -> Result<()> {
        let snapshot = self
            .catalog
            .get(id)?
            .ok_or_else(|| Error::not_found(format!("snapshot {}", id)))?;

        if let Err(e) = self
            .blobs
            .delete(&self.archive_container, &snapshot.file_name)
        {
            warn!(snapshot = %id, file = %snapshot.file_name, error = %e,
                "archive blob delete failed, removing catalog row anyway");
        }
        self.catalog.delete(id)
    }
}
