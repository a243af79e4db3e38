//! Backup service endpoint
//!
//! A single JSON endpoint; the `action` field selects the operation.

use rentvault_core::{BackupKind, Error, Result, SnapshotId};
use rentvault_engine::{BackupEngine, SnapshotIndex};
use serde::Deserialize;
use serde_json::{json, Value};

/// Requests accepted by the backup endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BackupAction {
    /// Run a full backup job
    CreateBackup {
        /// Defaults to `manual`; the scheduler passes `scheduled`
        #[serde(default = "default_kind")]
        kind: BackupKind,
    },
    /// List all catalog rows, newest first
    ListBackups,
    /// Signed download URL for one archive
    DownloadBackup { backup_id: String },
    /// Delete one snapshot (blob, then catalog row)
    DeleteBackup { backup_id: String },
}

fn default_kind() -> BackupKind {
    BackupKind::Manual
}

/// Dispatches backup actions against the engine and catalog index
pub struct BackupService {
    engine: BackupEngine,
    index: SnapshotIndex,
}

impl BackupService {
    pub fn new(engine: BackupEngine, index: SnapshotIndex) -> Self {
        Self { engine, index }
    }

    /// Handle one request, returning the JSON response body
    pub fn handle(&self, action: BackupAction) -> Value {
        match action {
            BackupAction::CreateBackup { kind } => match self.engine.create_backup(kind) {
                Ok(report) => json!({
                    "success": true,
                    "backup_id": report.snapshot_id.to_string(),
                    "file_size": report.size_bytes,
                    "files_included": report.files_included,
                }),
                Err(e) => failure(&e),
            },
            BackupAction::ListBackups => match self.index.list() {
                Ok(backups) => json!({ "backups": backups }),
                Err(e) => failure(&e),
            },
            BackupAction::DownloadBackup { backup_id } => {
                match parse_id(&backup_id).and_then(|id| self.index.download_url(id)) {
                    Ok(info) => json!({
                        "download_url": info.download_url,
                        "file_name": info.file_name,
                        "file_size": info.size_bytes,
                    }),
                    Err(e) => failure(&e),
                }
            }
            BackupAction::DeleteBackup { backup_id } => {
                match parse_id(&backup_id).and_then(|id| self.index.delete(id)) {
                    Ok(()) => json!({
                        "success": true,
                        "message": format!("backup {} deleted", backup_id),
                    }),
                    Err(e) => failure(&e),
                }
            }
        }
    }
}

fn parse_id(raw: &str) -> Result<SnapshotId> {
    SnapshotId::parse(raw).ok_or_else(|| Error::not_found(format!("snapshot {}", raw)))
}

fn failure(e: &Error) -> Value {
    json!({
        "success": false,
        "error": e.to_string(),
        "code": if e.is_not_found() { "not_found" } else { "internal" },
    })
}
