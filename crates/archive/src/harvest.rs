//! Blob harvesting
//!
//! Walks one container's listing and streams each object into the archive
//! under `storage/<container>/<leaf-name>`. A broken object is logged and
//! skipped; it must not fail the container or the job. Each object's bytes
//! are held only until appended, then released.

use crate::builder::ArchiveBuilder;
use crate::error::ArchiveResult;
use crate::manifest::paths;
use rentvault_core::BlobStore;
use tracing::warn;

/// Listing placeholder objects excluded from harvesting
pub const PLACEHOLDER_OBJECT: &str = ".emptyFolderPlaceholder";

/// Harvest every object in a container into the archive
///
/// Objects are processed in name-ascending order. Returns the number of
/// objects actually added. A listing failure degrades to an empty
/// container rather than failing the job.
///
/// # Errors
///
/// Returns an error only if appending to the archive itself fails.
pub fn harvest_container(
    blobs: &dyn BlobStore,
    container: &str,
    builder: &mut ArchiveBuilder,
) -> ArchiveResult<u64> {
    let mut listing = match blobs.list(container) {
        Ok(listing) => listing,
        Err(e) => {
            warn!(container, error = %e, "container listing failed, skipping container");
            return Ok(0);
        }
    };
    listing.sort_by(|a, b| a.name.cmp(&b.name));

    let mut added = 0u64;
    for object in listing {
        let leaf = leaf_name(&object.name);
        if leaf.is_empty() || leaf == PLACEHOLDER_OBJECT {
            continue;
        }

        let bytes = match blobs.download(container, &object.name) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(container, object = %object.name, error = %e,
                    "object download failed, skipping object");
                continue;
            }
        };

        builder.add_file(&paths::object(container, leaf), &bytes)?;
        added += 1;
    }

    Ok(added)
}

/// Last path segment of an object name
fn leaf_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ExportOptions;
    use crate::manifest::BackupManifest;
    use crate::reader::ArchiveReader;
    use chrono::Utc;
    use rentvault_core::testing::MemoryBlobStore;

    fn finish(builder: ArchiveBuilder) -> ArchiveReader {
        let bytes = builder
            .finish(&BackupManifest::new("test", Utc::now()))
            .unwrap();
        ArchiveReader::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn test_harvest_all_objects() {
        let blobs = MemoryBlobStore::new();
        blobs.seed("lead-uploads", "b.pdf", b"two".to_vec());
        blobs.seed("lead-uploads", "a.pdf", b"one".to_vec());

        let mut builder = ArchiveBuilder::new(&ExportOptions::default()).unwrap();
        let added = harvest_container(&blobs, "lead-uploads", &mut builder).unwrap();
        assert_eq!(added, 2);

        let reader = finish(builder);
        assert_eq!(
            reader.file("storage/lead-uploads/a.pdf"),
            Some(&b"one"[..])
        );
        assert_eq!(
            reader.file("storage/lead-uploads/b.pdf"),
            Some(&b"two"[..])
        );
    }

    #[test]
    fn test_harvest_skips_placeholder() {
        let blobs = MemoryBlobStore::new();
        blobs.seed("lead-uploads", ".emptyFolderPlaceholder", vec![]);
        blobs.seed("lead-uploads", "real.pdf", b"x".to_vec());
        blobs.seed("lead-uploads", "nested/.emptyFolderPlaceholder", vec![]);

        let mut builder = ArchiveBuilder::new(&ExportOptions::default()).unwrap();
        let added = harvest_container(&blobs, "lead-uploads", &mut builder).unwrap();
        assert_eq!(added, 1);
    }

    #[test]
    fn test_harvest_continues_past_broken_object() {
        let blobs = MemoryBlobStore::new();
        blobs.seed("docs", "a.pdf", b"a".to_vec());
        blobs.seed("docs", "broken.pdf", b"b".to_vec());
        blobs.seed("docs", "c.pdf", b"c".to_vec());
        blobs.poison_object("docs", "broken.pdf");

        let mut builder = ArchiveBuilder::new(&ExportOptions::default()).unwrap();
        let added = harvest_container(&blobs, "docs", &mut builder).unwrap();
        assert_eq!(added, 2);

        let reader = finish(builder);
        assert!(reader.file("storage/docs/broken.pdf").is_none());
        assert!(reader.file("storage/docs/c.pdf").is_some());
    }

    #[test]
    fn test_harvest_empty_container() {
        let blobs = MemoryBlobStore::new();
        let mut builder = ArchiveBuilder::new(&ExportOptions::default()).unwrap();
        let added = harvest_container(&blobs, "property-images", &mut builder).unwrap();
        assert_eq!(added, 0);
    }

    #[test]
    fn test_harvest_uses_leaf_name() {
        let blobs = MemoryBlobStore::new();
        blobs.seed("docs", "2026/08/contract.pdf", b"x".to_vec());

        let mut builder = ArchiveBuilder::new(&ExportOptions::default()).unwrap();
        let added = harvest_container(&blobs, "docs", &mut builder).unwrap();
        assert_eq!(added, 1);

        let reader = finish(builder);
        assert!(reader.file("storage/docs/contract.pdf").is_some());
    }
}
