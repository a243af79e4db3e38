//! Backup and import engines
//!
//! This crate orchestrates the pipeline ends:
//!
//! - [`backup`] — `create_backup`: serialize every registered collection,
//!   harvest every container, upload the archive, record the catalog row,
//!   then enforce retention
//! - [`retention`] — keep only the N most recent completed snapshots
//! - [`index`] — list / download-url / delete over the snapshot catalog
//! - [`import`] — merge an uploaded archive back into a live store,
//!   row by row, without aborting on individual failures
//!
//! One invocation is one synchronous job; collections and containers are
//! processed sequentially so peak memory stays bounded by the largest
//! single object.

pub mod backup;
pub mod import;
pub mod index;
pub mod retention;

pub use backup::{BackupConfig, BackupEngine, BackupReport, RETAINED_SNAPSHOTS};
pub use import::{merge_row, CollectionCounts, ImportEngine, ImportReport, MergeOutcome};
pub use index::{DownloadInfo, SnapshotIndex, DOWNLOAD_URL_TTL};
