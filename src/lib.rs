//! rentvault - backup/export and merge-import pipeline
//!
//! rentvault snapshots every record collection and blob container of a
//! rental-platform data store into one portable `.tar.zst` archive,
//! enforces a keep-most-recent retention policy over historical snapshots,
//! and can merge such an archive back into a live store with
//! insert-if-absent / update-or-skip-if-present semantics.
//!
//! # Quick Start
//!
//! ```ignore
//! use rentvault::{BackupConfig, BackupEngine, BackupKind};
//! use std::sync::Arc;
//!
//! // The three stores are external collaborators behind traits
//! let engine = BackupEngine::new(records, blobs, catalog, BackupConfig::default());
//! let report = engine.create_backup(BackupKind::Manual)?;
//! println!("{} objects in {}", report.files_included, report.file_name);
//! ```
//!
//! # Architecture
//!
//! The pipeline is split across focused crates: `rentvault-core` (types,
//! registry, store traits), `rentvault-codec` (tabular and SQL text forms),
//! `rentvault-archive` (tar+zstd assembly, harvesting), `rentvault-engine`
//! (backup/retention/import orchestration) and `rentvault-api` (the JSON
//! surface for the excluded HTTP/CLI layer). This crate re-exports the
//! public API.

pub use rentvault_api::{BackupAction, BackupService, ImportService};
pub use rentvault_archive::{
    harvest_container, paths, serialize_collection, ArchiveBuilder, ArchiveReader, BackupManifest,
    ExportOptions,
};
pub use rentvault_codec::{decode, encode, CodecError, Field, Table};
pub use rentvault_core::{
    BackupKind, BlobStore, CollectionSpec, Error, MergePolicy, ObjectInfo, Record, RecordStore,
    Result, Snapshot, SnapshotCatalog, SnapshotId, SnapshotMetadata, SnapshotStatus, StoreLayout,
};
pub use rentvault_engine::{
    BackupConfig, BackupEngine, BackupReport, CollectionCounts, ImportEngine, ImportReport,
    SnapshotIndex, RETAINED_SNAPSHOTS,
};

/// In-memory store doubles, re-exported for downstream test suites
pub mod testing {
    pub use rentvault_core::testing::{record, MemoryBlobStore, MemoryCatalog, MemoryRecordStore};
}
