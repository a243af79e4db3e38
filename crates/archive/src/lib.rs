//! Archive format for rentvault backups
//!
//! One backup job produces a single `.tar.zst` archive:
//!
//! ```text
//! backup-info.json                      manifest, written last
//! database/README.txt                   restoration order notes
//! database/<collection>.csv             tabular rendering (importer input)
//! database/<collection>.sql             INSERT-statement rendering
//! database/<collection>.json            structured rendering
//! storage/<container>/<object-name>     harvested blob bytes
//! ```
//!
//! The archive is assembled in memory behind a fixed-level zstd encoder;
//! each file is appended and released before the next one is read, so peak
//! memory tracks the largest single object plus the compressed output. The
//! manifest goes in last so its counts reflect what was actually included.

pub mod builder;
pub mod dataset;
pub mod error;
pub mod harvest;
pub mod manifest;
pub mod reader;

pub use builder::{ArchiveBuilder, ExportOptions};
pub use dataset::{restore_notes, serialize_collection, CollectionArtifacts};
pub use error::{ArchiveError, ArchiveResult};
pub use harvest::{harvest_container, PLACEHOLDER_OBJECT};
pub use manifest::{paths, xxh3_hex, BackupManifest, ARCHIVE_EXTENSION, ARCHIVE_FORMAT_VERSION};
pub use reader::ArchiveReader;
