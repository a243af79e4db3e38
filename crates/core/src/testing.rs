//! In-memory store doubles for tests
//!
//! These implement the three store traits against `parking_lot`-guarded
//! maps, plus failure injection so partial-failure paths can be exercised
//! without a live backend:
//!
//! - [`MemoryRecordStore::poison_collection`] makes `fetch_all` fail
//! - [`MemoryBlobStore::poison_object`] makes `download` fail
//! - [`MemoryBlobStore::fail_uploads`] makes every `upload` fail
//! - [`MemoryCatalog::fail_writes`] makes `insert`/`update` fail

use crate::error::{Error, Result};
use crate::traits::{BlobStore, ObjectInfo, Record, RecordStore, SnapshotCatalog};
use crate::types::{Snapshot, SnapshotId};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// In-memory record store
#[derive(Default)]
pub struct MemoryRecordStore {
    tables: RwLock<BTreeMap<String, Vec<Record>>>,
    poisoned: RwLock<HashSet<String>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection with records
    pub fn seed(&self, collection: &str, records: Vec<Record>) {
        self.tables.write().insert(collection.to_string(), records);
    }

    /// Make every `fetch_all` of this collection fail
    pub fn poison_collection(&self, collection: &str) {
        self.poisoned.write().insert(collection.to_string());
    }

    /// Number of records currently in a collection
    pub fn len(&self, collection: &str) -> usize {
        self.tables
            .read()
            .get(collection)
            .map(|t| t.len())
            .unwrap_or(0)
    }

    /// Whether a collection holds no records
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Snapshot of a collection's records, insertion order
    pub fn records(&self, collection: &str) -> Vec<Record> {
        self.tables
            .read()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn fetch_all(&self, collection: &str) -> Result<Vec<Record>> {
        if self.poisoned.read().contains(collection) {
            return Err(Error::record_store(format!(
                "read of '{}' failed",
                collection
            )));
        }
        Ok(self.records(collection))
    }

    fn find_by_key(
        &self,
        collection: &str,
        key_column: &str,
        key: &Value,
    ) -> Result<Option<Record>> {
        let tables = self.tables.read();
        let Some(table) = tables.get(collection) else {
            return Ok(None);
        };
        Ok(table
            .iter()
            .find(|r| r.get(key_column) == Some(key))
            .cloned())
    }

    fn insert(&self, collection: &str, record: Record) -> Result<()> {
        self.tables
            .write()
            .entry(collection.to_string())
            .or_default()
            .push(record);
        Ok(())
    }

    fn update(
        &self,
        collection: &str,
        key_column: &str,
        key: &Value,
        record: Record,
    ) -> Result<()> {
        let mut tables = self.tables.write();
        let table = tables.entry(collection.to_string()).or_default();
        match table.iter_mut().find(|r| r.get(key_column) == Some(key)) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(Error::record_store(format!(
                "no '{}' record with {} = {}",
                collection, key_column, key
            ))),
        }
    }
}

/// In-memory blob store
#[derive(Default)]
pub struct MemoryBlobStore {
    containers: RwLock<BTreeMap<String, BTreeMap<String, Vec<u8>>>>,
    poisoned: RwLock<HashSet<(String, String)>>,
    fail_uploads: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object into a container
    pub fn seed(&self, container: &str, name: &str, bytes: Vec<u8>) {
        self.containers
            .write()
            .entry(container.to_string())
            .or_default()
            .insert(name.to_string(), bytes);
    }

    /// Make every `download` of this object fail
    pub fn poison_object(&self, container: &str, name: &str) {
        self.poisoned
            .write()
            .insert((container.to_string(), name.to_string()));
    }

    /// Make every `upload` fail
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Names of objects currently in a container, ascending
    pub fn object_names(&self, container: &str) -> Vec<String> {
        self.containers
            .read()
            .get(container)
            .map(|c| c.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn list(&self, container: &str) -> Result<Vec<ObjectInfo>> {
        let containers = self.containers.read();
        let Some(objects) = containers.get(container) else {
            return Ok(vec![]);
        };
        // BTreeMap iteration gives the name-ascending listing order
        Ok(objects
            .iter()
            .map(|(name, bytes)| ObjectInfo {
                name: name.clone(),
                size: bytes.len() as u64,
            })
            .collect())
    }

    fn download(&self, container: &str, name: &str) -> Result<Vec<u8>> {
        if self
            .poisoned
            .read()
            .contains(&(container.to_string(), name.to_string()))
        {
            return Err(Error::blob_store(format!(
                "download of '{}/{}' failed",
                container, name
            )));
        }
        self.containers
            .read()
            .get(container)
            .and_then(|c| c.get(name))
            .cloned()
            .ok_or_else(|| Error::not_found(format!("object '{}/{}'", container, name)))
    }

    fn upload(&self, container: &str, name: &str, bytes: &[u8]) -> Result<()> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(Error::blob_store(format!(
                "upload of '{}/{}' failed",
                container, name
            )));
        }
        self.seed(container, name, bytes.to_vec());
        Ok(())
    }

    fn delete(&self, container: &str, name: &str) -> Result<()> {
        if let Some(objects) = self.containers.write().get_mut(container) {
            objects.remove(name);
        }
        Ok(())
    }

    fn signed_url(&self, container: &str, name: &str, expires_in: Duration) -> Result<String> {
        let containers = self.containers.read();
        let exists = containers
            .get(container)
            .map(|c| c.contains_key(name))
            .unwrap_or(false);
        if !exists {
            return Err(Error::not_found(format!("object '{}/{}'", container, name)));
        }
        Ok(format!(
            "memory://{}/{}?expires_in={}",
            container,
            name,
            expires_in.as_secs()
        ))
    }
}

/// In-memory snapshot catalog
#[derive(Default)]
pub struct MemoryCatalog {
    rows: RwLock<Vec<Snapshot>>,
    fail_writes: AtomicBool,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `insert`/`update` fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of rows in the catalog
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Whether the catalog holds no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SnapshotCatalog for MemoryCatalog {
    fn insert(&self, snapshot: &Snapshot) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::catalog("insert failed"));
        }
        let mut rows = self.rows.write();
        if rows.iter().any(|r| r.id == snapshot.id) {
            return Err(Error::catalog(format!("duplicate id {}", snapshot.id)));
        }
        rows.push(snapshot.clone());
        Ok(())
    }

    fn update(&self, snapshot: &Snapshot) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::catalog("update failed"));
        }
        let mut rows = self.rows.write();
        match rows.iter_mut().find(|r| r.id == snapshot.id) {
            Some(row) => {
                *row = snapshot.clone();
                Ok(())
            }
            None => Err(Error::catalog(format!("no row with id {}", snapshot.id))),
        }
    }

    fn get(&self, id: SnapshotId) -> Result<Option<Snapshot>> {
        Ok(self.rows.read().iter().find(|r| r.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<Snapshot>> {
        let mut rows = self.rows.read().clone();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(rows)
    }

    fn delete(&self, id: SnapshotId) -> Result<()> {
        self.rows.write().retain(|r| r.id != id);
        Ok(())
    }
}

/// Build a record from `(column, value)` pairs
pub fn record(fields: &[(&str, Value)]) -> Record {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_store_seed_and_fetch() {
        let store = MemoryRecordStore::new();
        store.seed(
            "contact_requests",
            vec![record(&[("id", json!(1)), ("name", json!("Ada"))])],
        );

        let records = store.fetch_all("contact_requests").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("name"), Some(&json!("Ada")));

        assert!(store.fetch_all("missing").unwrap().is_empty());
    }

    #[test]
    fn test_record_store_poison() {
        let store = MemoryRecordStore::new();
        store.seed("contact_requests", vec![record(&[("id", json!(1))])]);
        store.poison_collection("contact_requests");
        assert!(store.fetch_all("contact_requests").is_err());
    }

    #[test]
    fn test_record_store_find_and_update() {
        let store = MemoryRecordStore::new();
        store
            .insert(
                "contact_requests",
                record(&[("id", json!(7)), ("name", json!("Ada"))]),
            )
            .unwrap();

        let found = store
            .find_by_key("contact_requests", "id", &json!(7))
            .unwrap();
        assert!(found.is_some());

        store
            .update(
                "contact_requests",
                "id",
                &json!(7),
                record(&[("id", json!(7)), ("name", json!("Grace"))]),
            )
            .unwrap();
        let found = store
            .find_by_key("contact_requests", "id", &json!(7))
            .unwrap()
            .unwrap();
        assert_eq!(found.get("name"), Some(&json!("Grace")));

        let missing = store.update("contact_requests", "id", &json!(99), Record::new());
        assert!(missing.is_err());
    }

    #[test]
    fn test_blob_store_listing_is_sorted() {
        let store = MemoryBlobStore::new();
        store.seed("docs", "b.pdf", vec![2]);
        store.seed("docs", "a.pdf", vec![1]);

        let names: Vec<String> = store
            .list("docs")
            .unwrap()
            .into_iter()
            .map(|o| o.name)
            .collect();
        assert_eq!(names, vec!["a.pdf".to_string(), "b.pdf".to_string()]);
    }

    #[test]
    fn test_blob_store_poison_and_fail_uploads() {
        let store = MemoryBlobStore::new();
        store.seed("docs", "a.pdf", vec![1]);
        store.poison_object("docs", "a.pdf");
        assert!(store.download("docs", "a.pdf").is_err());

        store.fail_uploads(true);
        assert!(store.upload("docs", "b.pdf", &[2]).is_err());
        store.fail_uploads(false);
        assert!(store.upload("docs", "b.pdf", &[2]).is_ok());
    }

    #[test]
    fn test_blob_store_signed_url() {
        let store = MemoryBlobStore::new();
        store.seed("backups", "x.tar.zst", vec![0]);

        let url = store
            .signed_url("backups", "x.tar.zst", Duration::from_secs(3600))
            .unwrap();
        assert!(url.contains("x.tar.zst"));

        let err = store
            .signed_url("backups", "missing", Duration::from_secs(1))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_catalog_list_newest_first() {
        use crate::types::{BackupKind, SnapshotMetadata, SnapshotStatus};
        use chrono::{TimeZone, Utc};

        let catalog = MemoryCatalog::new();
        for (i, hour) in [10u32, 12, 11].iter().enumerate() {
            let snapshot = Snapshot {
                id: SnapshotId::new(),
                created_at: Utc.with_ymd_and_hms(2026, 8, 7, *hour, 0, 0).unwrap(),
                backup_at: Utc.with_ymd_and_hms(2026, 8, 7, *hour, 0, 0).unwrap(),
                file_name: format!("backup-{}.tar.zst", i),
                storage_path: format!("backups/backup-{}.tar.zst", i),
                size_bytes: None,
                kind: BackupKind::Scheduled,
                status: SnapshotStatus::Completed,
                includes_database: true,
                includes_storage: false,
                metadata: SnapshotMetadata::default(),
            };
            catalog.insert(&snapshot).unwrap();
        }

        let listed = catalog.list().unwrap();
        assert_eq!(listed[0].file_name, "backup-1.tar.zst");
        assert_eq!(listed[1].file_name, "backup-2.tar.zst");
        assert_eq!(listed[2].file_name, "backup-0.tar.zst");
    }

    #[test]
    fn test_catalog_delete_is_idempotent() {
        let catalog = MemoryCatalog::new();
        let id = SnapshotId::new();
        assert!(catalog.delete(id).is_ok());
        assert!(catalog.get(id).unwrap().is_none());
    }
}
