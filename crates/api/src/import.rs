//! Import service endpoint
//!
//! The transport layer receives a multipart upload with a single archive
//! file field and hands the file's bytes to [`ImportService::handle_upload`].

use rentvault_engine::ImportEngine;
use serde_json::{json, Value};

/// Dispatches archive uploads to the merge importer
pub struct ImportService {
    engine: ImportEngine,
}

impl ImportService {
    pub fn new(engine: ImportEngine) -> Self {
        Self { engine }
    }

    /// Merge one uploaded archive, returning the JSON response body
    ///
    /// Per-row failures surface inside `details`/`errors` with
    /// `success: true`; only an unusable archive yields `success: false`.
    pub fn handle_upload(&self, archive: &[u8]) -> Value {
        match self.engine.import_archive(archive) {
            Ok(report) => {
                let rows: u64 = report.details.values().map(|c| c.total()).sum();
                json!({
                    "success": true,
                    "message": format!(
                        "merged {} rows across {} collections",
                        rows,
                        report.details.len()
                    ),
                    "details": report.details,
                    "errors": report.errors,
                })
            }
            Err(e) => json!({
                "success": false,
                "message": "import failed",
                "error": e.to_string(),
            }),
        }
    }
}
