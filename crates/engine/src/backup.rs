//! Backup job orchestration
//!
//! `create_backup` runs the whole export: collection dumps, blob harvest,
//! archive assembly, upload, catalog accounting, retention. Degraded reads
//! (a failing collection, a broken object) are logged and the job keeps
//! going; only an upload failure is fatal to the call. The catalog row is
//! created `pending` at job start and never ends up `completed` unless the
//! archive is durably uploaded.

use crate::retention;
use chrono::{DateTime, Utc};
use rentvault_archive::{
    harvest_container, paths, restore_notes, serialize_collection, xxh3_hex, ArchiveBuilder,
    ArchiveError, BackupManifest, ExportOptions, ARCHIVE_EXTENSION,
};
use rentvault_core::{
    BackupKind, BlobStore, Error, RecordStore, Result, Snapshot, SnapshotCatalog, SnapshotId,
    SnapshotMetadata, SnapshotStatus, StoreLayout,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Number of completed snapshots the retention policy keeps
pub const RETAINED_SNAPSHOTS: usize = 10;

/// Blob container holding the uploaded archives
pub const DEFAULT_ARCHIVE_CONTAINER: &str = "backups";

/// Configuration of the backup engine
#[derive(Debug, Clone)]
pub struct BackupConfig {
    /// Collections and containers to include
    pub layout: StoreLayout,
    /// Container the archives are uploaded into
    pub archive_container: String,
    /// Retention window
    pub retained_snapshots: usize,
    /// Zstd level for the archive
    pub compression_level: i32,
    /// Source-system identifier recorded in the manifest
    pub source: String,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            layout: StoreLayout::rental_site(),
            archive_container: DEFAULT_ARCHIVE_CONTAINER.to_string(),
            retained_snapshots: RETAINED_SNAPSHOTS,
            compression_level: ExportOptions::default().compression_level,
            source: "rentvault".to_string(),
        }
    }
}

/// Summary returned after a successful backup
#[derive(Debug, Clone)]
pub struct BackupReport {
    /// Catalog id of the new snapshot
    pub snapshot_id: SnapshotId,
    /// Archive file name
    pub file_name: String,
    /// Archive size in bytes
    pub size_bytes: u64,
    /// Harvested storage objects
    pub files_included: u64,
    /// Collections dumped
    pub collections: Vec<String>,
    /// Containers harvested
    pub containers: Vec<String>,
}

/// Orchestrates backup jobs against the three stores
pub struct BackupEngine {
    records: Arc<dyn RecordStore>,
    blobs: Arc<dyn BlobStore>,
    catalog: Arc<dyn SnapshotCatalog>,
    config: BackupConfig,
}

impl BackupEngine {
    pub fn new(
        records: Arc<dyn RecordStore>,
        blobs: Arc<dyn BlobStore>,
        catalog: Arc<dyn SnapshotCatalog>,
        config: BackupConfig,
    ) -> Self {
        Self {
            records,
            blobs,
            catalog,
            config,
        }
    }

    /// Run one full backup job
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be assembled or uploaded, or
    /// if the initial catalog insert fails. Collection reads and object
    /// downloads degrade without failing the job.
    pub fn create_backup(&self, kind: BackupKind) -> Result<BackupReport> {
        let backup_at = Utc::now();
        let file_name = archive_file_name(backup_at);

        let mut snapshot = Snapshot {
            id: SnapshotId::new(),
            created_at: Utc::now(),
            backup_at,
            storage_path: format!("{}/{}", self.config.archive_container, file_name),
            file_name,
            size_bytes: None,
            kind,
            status: SnapshotStatus::Pending,
            includes_database: !self.config.layout.collections.is_empty(),
            includes_storage: !self.config.layout.containers.is_empty(),
            metadata: SnapshotMetadata::default(),
        };
        self.catalog.insert(&snapshot)?;

        match self.run_job(&mut snapshot, backup_at) {
            Ok(report) => {
                if let Err(e) = retention::enforce(
                    self.catalog.as_ref(),
                    self.blobs.as_ref(),
                    &self.config.archive_container,
                    self.config.retained_snapshots,
                ) {
                    warn!(error = %e, "retention cleanup failed");
                }
                Ok(report)
            }
            Err(e) => {
                snapshot.status = SnapshotStatus::Failed;
                if let Err(update_err) = self.catalog.update(&snapshot) {
                    warn!(snapshot = %snapshot.id, error = %update_err,
                        "could not flag snapshot as failed");
                }
                Err(e)
            }
        }
    }

    fn run_job(&self, snapshot: &mut Snapshot, backup_at: DateTime<Utc>) -> Result<BackupReport> {
        let options = ExportOptions {
            compression_level: self.config.compression_level,
        };
        let mut builder = ArchiveBuilder::new(&options).map_err(to_core)?;
        let mut manifest = BackupManifest::new(&self.config.source, backup_at);

        let collection_names = self.config.layout.collection_names();
        builder
            .add_file(paths::README, restore_notes(&collection_names).as_bytes())
            .map_err(to_core)?;

        for spec in &self.config.layout.collections {
            let records = match self.records.fetch_all(&spec.name) {
                Ok(records) => records,
                Err(e) => {
                    warn!(collection = %spec.name, error = %e,
                        "collection read failed, writing empty artifacts");
                    Vec::new()
                }
            };

            let artifacts = serialize_collection(&spec.name, &records).map_err(to_core)?;
            for (path, data) in [
                (paths::collection_tabular(&spec.name), &artifacts.tabular),
                (paths::collection_sql(&spec.name), &artifacts.sql),
                (paths::collection_structured(&spec.name), &artifacts.structured),
            ] {
                manifest.add_checksum(path.as_str(), xxh3_hex(data.as_bytes()));
                builder.add_file(&path, data.as_bytes()).map_err(to_core)?;
            }
            manifest.collections.push(spec.name.clone());
        }

        let mut total_objects = 0u64;
        for container in &self.config.layout.containers {
            let added =
                harvest_container(self.blobs.as_ref(), container, &mut builder).map_err(to_core)?;
            snapshot
                .metadata
                .container_file_counts
                .insert(container.clone(), added);
            manifest.containers.push(container.clone());
            total_objects += added;
        }
        manifest.files_included = total_objects;

        let bytes = builder.finish(&manifest).map_err(to_core)?;
        info!(file = %snapshot.file_name, size = bytes.len(), objects = total_objects,
            "archive assembled");

        self.blobs
            .upload(&self.config.archive_container, &snapshot.file_name, &bytes)?;

        snapshot.status = SnapshotStatus::Completed;
        snapshot.size_bytes = Some(bytes.len() as u64);
        snapshot.metadata.collections = manifest.collections.clone();
        snapshot.metadata.containers = manifest.containers.clone();
        if let Err(e) = self.catalog.update(snapshot) {
            // Orphaned blob: retention only acts on rows it can see, so the
            // archive stays until cleaned up out of band.
            warn!(snapshot = %snapshot.id, error = %e,
                "archive uploaded but catalog update failed");
        }
        info!(snapshot = %snapshot.id, "backup completed");

        Ok(BackupReport {
            snapshot_id: snapshot.id,
            file_name: snapshot.file_name.clone(),
            size_bytes: bytes.len() as u64,
            files_included: total_objects,
            collections: manifest.collections,
            containers: manifest.containers,
        })
    }
}

/// Archive file name: second-resolution timestamp plus a random suffix to
/// avoid collisions between jobs started in the same second
fn archive_file_name(backup_at: DateTime<Utc>) -> String {
    let suffix: u32 = rand::random();
    format!(
        "backup-{}-{:08x}{}",
        backup_at.format("%Y%m%d-%H%M%S"),
        suffix,
        ARCHIVE_EXTENSION
    )
}

fn to_core(e: ArchiveError) -> Error {
    Error::archive(e.to_string())
}
