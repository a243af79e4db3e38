//! JSON service surface
//!
//! The HTTP/CLI layer in front of the pipeline is an external
//! collaborator; this crate gives it two plain request/response surfaces:
//!
//! - [`BackupService`] — one endpoint, `action`-field dispatch:
//!   `create_backup`, `list_backups`, `download_backup`, `delete_backup`
//! - [`ImportService`] — takes the uploaded archive bytes, returns the
//!   merge report
//!
//! Responses are `serde_json::Value` bodies. Hard failures respond
//! `{"success": false, "error": ...}` with a `code` the transport can map
//! to a status; partial failures respond success with the degradation
//! visible in `details`/`errors`.

pub mod backup;
pub mod import;

pub use backup::{BackupAction, BackupService};
pub use import::ImportService;
