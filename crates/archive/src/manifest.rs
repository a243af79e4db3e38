//! Archive manifest and path layout
//!
//! `backup-info.json` is the accounting record inside every archive: what
//! was included, when, and from which system. It is written last, so the
//! declared counts describe what actually made it into the archive.
//! Checksums of the database artifacts are recorded for best-effort
//! verification on read; they are not enforced at write time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current archive format version
pub const ARCHIVE_FORMAT_VERSION: u32 = 1;

/// File extension of backup archives
pub const ARCHIVE_EXTENSION: &str = ".tar.zst";

/// Checksum algorithm recorded in the manifest
pub const CHECKSUM_ALGORITHM: &str = "xxh3";

/// Paths within the archive
pub mod paths {
    /// Manifest file name
    pub const MANIFEST: &str = "backup-info.json";
    /// Directory holding the collection dumps
    pub const DATABASE_DIR: &str = "database";
    /// Directory holding harvested blob objects
    pub const STORAGE_DIR: &str = "storage";
    /// Restoration-order notes
    pub const README: &str = "database/README.txt";

    /// Tabular rendering of a collection (importer input)
    pub fn collection_tabular(name: &str) -> String {
        format!("{}/{}.csv", DATABASE_DIR, name)
    }

    /// INSERT-statement rendering of a collection
    pub fn collection_sql(name: &str) -> String {
        format!("{}/{}.sql", DATABASE_DIR, name)
    }

    /// Structured rendering of a collection
    pub fn collection_structured(name: &str) -> String {
        format!("{}/{}.json", DATABASE_DIR, name)
    }

    /// Harvested object path
    pub fn object(container: &str, leaf: &str) -> String {
        format!("{}/{}/{}", STORAGE_DIR, container, leaf)
    }
}

/// Manifest of one backup archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupManifest {
    /// Archive format version
    pub format_version: u32,

    /// Identifier of the system the backup was taken from
    pub source: String,

    /// When the manifest was written
    pub created_at: DateTime<Utc>,

    /// Logical backup timestamp (start of the job)
    pub backup_at: DateTime<Utc>,

    /// Record collections included in the archive
    pub collections: Vec<String>,

    /// Blob containers included in the archive
    pub containers: Vec<String>,

    /// Total number of harvested storage objects
    pub files_included: u64,

    /// Checksum algorithm used (currently "xxh3")
    pub checksum_algorithm: String,

    /// Checksums of the database artifacts, keyed by archive path
    pub checksums: BTreeMap<String, String>,
}

impl BackupManifest {
    /// Create an empty manifest for a backup started at `backup_at`
    pub fn new(source: impl Into<String>, backup_at: DateTime<Utc>) -> Self {
        Self {
            format_version: ARCHIVE_FORMAT_VERSION,
            source: source.into(),
            created_at: Utc::now(),
            backup_at,
            collections: Vec::new(),
            containers: Vec::new(),
            files_included: 0,
            checksum_algorithm: CHECKSUM_ALGORITHM.to_string(),
            checksums: BTreeMap::new(),
        }
    }

    /// Record a checksum for an archive file
    pub fn add_checksum(&mut self, path: impl Into<String>, checksum: impl Into<String>) {
        self.checksums.insert(path.into(), checksum.into());
    }
}

/// Compute xxh3 hash of data and return as hex string
pub fn xxh3_hex(data: &[u8]) -> String {
    use xxhash_rust::xxh3::xxh3_64;
    format!("{:016x}", xxh3_64(data))
}
