//! Snapshot catalog record types
//!
//! A [`Snapshot`] is the durable bookkeeping row describing one archive:
//! where it lives, how big it is, and where it sits in its lifecycle.
//! Exactly the most recent [`crate::layout::StoreLayout`]-configured number
//! of `completed` snapshots may exist at any time; retention enforcement
//! lives in the engine crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Opaque identifier for a snapshot catalog record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(Uuid);

impl SnapshotId {
    /// Generate a fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an id from its string form
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a backup was initiated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupKind {
    /// Triggered by the platform scheduler
    Scheduled,
    /// Triggered explicitly by an operator
    Manual,
}

/// Lifecycle status of a snapshot
///
/// Rows are created `pending` at job start, move to `completed` once the
/// archive is uploaded and accounted for, or end `failed`. Retention only
/// ever counts `completed` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotStatus {
    /// Job started, archive not yet uploaded
    Pending,
    /// Archive uploaded and catalog row finalized
    Completed,
    /// Job failed before the archive was durable
    Failed,
}

/// Free-form accounting metadata recorded with a completed snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Record collections included in the archive
    pub collections: Vec<String>,
    /// Blob containers included in the archive
    pub containers: Vec<String>,
    /// Objects harvested per container
    pub container_file_counts: BTreeMap<String, u64>,
}

/// One catalog row describing an archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Opaque catalog id
    pub id: SnapshotId,
    /// When the catalog row was created
    pub created_at: DateTime<Utc>,
    /// Logical backup timestamp (start of the job)
    pub backup_at: DateTime<Utc>,
    /// Archive file name, e.g. `backup-20260807-153000-1a2b3c4d.tar.zst`
    pub file_name: String,
    /// Path of the archive inside the blob store
    pub storage_path: String,
    /// Archive size in bytes, unknown until the upload completes
    pub size_bytes: Option<u64>,
    /// How the backup was initiated
    pub kind: BackupKind,
    /// Lifecycle status
    pub status: SnapshotStatus,
    /// Whether any record collections were dumped
    pub includes_database: bool,
    /// Whether any blob containers were harvested
    pub includes_storage: bool,
    /// Included-collections/containers accounting
    pub metadata: SnapshotMetadata,
}

impl Snapshot {
    /// Whether this row counts against the retention window
    pub fn is_completed(&self) -> bool {
        self.status == SnapshotStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        Snapshot {
            id: SnapshotId::new(),
            created_at: Utc::now(),
            backup_at: Utc::now(),
            file_name: "backup-20260807-120000-deadbeef.tar.zst".to_string(),
            storage_path: "backups/backup-20260807-120000-deadbeef.tar.zst".to_string(),
            size_bytes: Some(1024),
            kind: BackupKind::Manual,
            status: SnapshotStatus::Completed,
            includes_database: true,
            includes_storage: true,
            metadata: SnapshotMetadata::default(),
        }
    }

    #[test]
    fn test_snapshot_id_roundtrip() {
        let id = SnapshotId::new();
        let parsed = SnapshotId::parse(&id.to_string());
        assert_eq!(parsed, Some(id));

        assert!(SnapshotId::parse("not-a-uuid").is_none());
    }

    #[test]
    fn test_status_serde_lowercase() {
        let json = serde_json::to_string(&SnapshotStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
        let json = serde_json::to_string(&BackupKind::Scheduled).unwrap();
        assert_eq!(json, "\"scheduled\"");
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let snapshot = sample();
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, parsed);
    }

    #[test]
    fn test_is_completed() {
        let mut snapshot = sample();
        assert!(snapshot.is_completed());
        snapshot.status = SnapshotStatus::Pending;
        assert!(!snapshot.is_completed());
        snapshot.status = SnapshotStatus::Failed;
        assert!(!snapshot.is_completed());
    }
}
