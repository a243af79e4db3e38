//! Snapshot retention enforcement
//!
//! The sole enforcement point for the "keep only the N most recent
//! completed snapshots" invariant. Runs after every successful backup and
//! is idempotent: deleting an already-deleted snapshot is a no-op.

use rentvault_core::{BlobStore, Result, Snapshot, SnapshotCatalog};
use tracing::{info, warn};

/// Delete completed snapshots beyond the `keep` most recent
///
/// Rows are ordered by creation time descending, ties broken by catalog
/// id. For each surplus row the backing archive blob is deleted first; a
/// blob-delete failure is logged and the row is still removed (a dangling
/// blob is acceptable, a catalog row pointing at a blob that should be
/// gone is not). Pending and failed rows never count against the window.
///
/// Returns the number of catalog rows removed.
///
/// # Errors
///
/// Returns an error only if the catalog listing fails.
pub fn enforce(
    catalog: &dyn SnapshotCatalog,
    blobs: &dyn BlobStore,
    archive_container: &str,
    keep: usize,
) -> Result<u64> {
    let mut completed: Vec<Snapshot> = catalog
        .list()?
        .into_iter()
        .filter(|s| s.is_completed())
        .collect();
    completed.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });

    let mut purged = 0u64;
    for snapshot in completed.iter().skip(keep) {
        if let Err(e) = blobs.delete(archive_container, &snapshot.file_name) {
            warn!(snapshot = %snapshot.id, file = %snapshot.file_name, error = %e,
                "archive blob delete failed, leaving dangling blob");
        }
        match catalog.delete(snapshot.id) {
            Ok(()) => {
                purged += 1;
                info!(snapshot = %snapshot.id, file = %snapshot.file_name,
                    "purged expired snapshot");
            }
            Err(e) => {
                warn!(snapshot = %snapshot.id, error = %e, "catalog row delete failed");
            }
        }
    }

    Ok(purged)
}
