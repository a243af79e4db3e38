//! Core types and store abstractions for the rentvault pipeline
//!
//! This crate defines everything the backup and import engines share:
//!
//! - The snapshot catalog record ([`Snapshot`]) and its lifecycle enums
//! - The collection registry ([`StoreLayout`], [`CollectionSpec`]) that maps
//!   collection names to primary keys and merge policies
//! - The external-store traits ([`RecordStore`], [`BlobStore`],
//!   [`SnapshotCatalog`]) behind which the live relational store, blob store
//!   and catalog live
//! - The shared [`Error`] type
//!
//! The live stores themselves are external collaborators. In-memory
//! implementations of the three traits are provided in [`testing`] for use
//! by the engine and API test suites.

pub mod error;
pub mod layout;
pub mod testing;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use layout::{CollectionSpec, MergePolicy, StoreLayout};
pub use traits::{BlobStore, ObjectInfo, Record, RecordStore, SnapshotCatalog};
pub use types::{BackupKind, Snapshot, SnapshotId, SnapshotMetadata, SnapshotStatus};
