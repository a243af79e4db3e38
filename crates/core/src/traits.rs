//! Store abstractions
//!
//! The live relational store, blob store and snapshot catalog are external
//! collaborators; the pipeline only talks to them through these traits.
//! All methods block until the underlying call completes. Implementations
//! must be safe to share across threads (`Send + Sync`), though the
//! pipeline itself runs one job at a time.

use crate::error::Result;
use crate::types::{Snapshot, SnapshotId};
use serde_json::Value;
use std::time::Duration;

/// One structured row, as a column-name → JSON-value mapping
pub type Record = serde_json::Map<String, Value>;

/// A listed blob-store object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    /// Object name within its container (may contain `/` segments)
    pub name: String,
    /// Object size in bytes
    pub size: u64,
}

/// Query/insert/update primitives of the relational store
pub trait RecordStore: Send + Sync {
    /// Fetch every record in a collection
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails; the backup job treats
    /// this as a degraded collection, not a fatal condition.
    fn fetch_all(&self, collection: &str) -> Result<Vec<Record>>;

    /// Look up a record by its primary identifier column
    ///
    /// Returns `None` if no record carries `key` in `key_column`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying lookup fails.
    fn find_by_key(&self, collection: &str, key_column: &str, key: &Value)
        -> Result<Option<Record>>;

    /// Insert a new record
    ///
    /// # Errors
    ///
    /// Returns an error on uniqueness violations or store failures.
    fn insert(&self, collection: &str, record: Record) -> Result<()>;

    /// Overwrite the record identified by `key` in `key_column`
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not exist or the write fails.
    fn update(
        &self,
        collection: &str,
        key_column: &str,
        key: &Value,
        record: Record,
    ) -> Result<()>;
}

/// List/get/put/delete/signed-URL primitives of the blob store
pub trait BlobStore: Send + Sync {
    /// List every object in a container, name-ascending
    ///
    /// Pagination against the real store is internal to the implementation;
    /// callers always see the complete listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails.
    fn list(&self, container: &str) -> Result<Vec<ObjectInfo>>;

    /// Download an object's bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the object is missing or the transfer fails.
    fn download(&self, container: &str, name: &str) -> Result<Vec<u8>>;

    /// Upload an object, overwriting any existing one of the same name
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer fails.
    fn upload(&self, container: &str, name: &str, bytes: &[u8]) -> Result<()>;

    /// Delete an object; deleting a missing object is a no-op
    ///
    /// # Errors
    ///
    /// Returns an error if the delete call itself fails.
    fn delete(&self, container: &str, name: &str) -> Result<()>;

    /// Produce a time-limited signed download URL
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if the object does not exist.
    fn signed_url(&self, container: &str, name: &str, expires_in: Duration) -> Result<String>;
}

/// Row CRUD over the snapshot catalog
pub trait SnapshotCatalog: Send + Sync {
    /// Insert a new catalog row
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or the id already exists.
    fn insert(&self, snapshot: &Snapshot) -> Result<()>;

    /// Overwrite an existing catalog row (matched by id)
    ///
    /// # Errors
    ///
    /// Returns an error if the row does not exist or the write fails.
    fn update(&self, snapshot: &Snapshot) -> Result<()>;

    /// Fetch a catalog row by id
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn get(&self, id: SnapshotId) -> Result<Option<Snapshot>>;

    /// All catalog rows, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn list(&self) -> Result<Vec<Snapshot>>;

    /// Delete a catalog row; deleting a missing row is a no-op
    ///
    /// # Errors
    ///
    /// Returns an error if the delete call itself fails.
    fn delete(&self, id: SnapshotId) -> Result<()>;
}
