//! Merge importer
//!
//! Re-ingests an uploaded archive into a live record store. The collection
//! set comes from the fixed registry, never from the manifest, so an
//! archive cannot introduce unexpected collections. Each row is merged
//! inside its own error boundary: a bad row increments `skipped` and adds
//! an error string, and the batch keeps going. The only hard failures are
//! an unreadable archive and a missing required collection file.

use rentvault_archive::{paths, ArchiveReader};
use rentvault_codec::{decode, Table};
use rentvault_core::{CollectionSpec, Error, MergePolicy, RecordStore, Result, StoreLayout};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// What happened to one archived row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Row was new and has been inserted
    Inserted,
    /// Row existed and has been overwritten
    Updated,
    /// Row existed and was left untouched
    Skipped,
    /// Row could not be merged; counts as skipped in the report
    Failed(String),
}

/// Per-collection merge counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionCounts {
    pub inserted: u64,
    pub updated: u64,
    pub skipped: u64,
}

impl CollectionCounts {
    /// Rows accounted for; always equals the number of rows decoded
    pub fn total(&self) -> u64 {
        self.inserted + self.updated + self.skipped
    }
}

/// Per-invocation import report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Counters per registered collection
    pub details: BTreeMap<String, CollectionCounts>,
    /// Human-readable errors, in processing order
    pub errors: Vec<String>,
}

/// Merges archives into a live record store
pub struct ImportEngine {
    records: Arc<dyn RecordStore>,
    layout: StoreLayout,
}

impl ImportEngine {
    pub fn new(records: Arc<dyn RecordStore>, layout: StoreLayout) -> Self {
        Self { records, layout }
    }

    /// Merge one uploaded archive
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the archive cannot be opened or
    /// a required collection's tabular file is absent. Everything else
    /// degrades into the report's counters and error list.
    pub fn import_archive(&self, data: &[u8]) -> Result<ImportReport> {
        let reader = ArchiveReader::from_bytes(data)
            .map_err(|e| Error::invalid_input(format!("cannot open archive: {}", e)))?;

        let mut report = ImportReport::default();
        for spec in &self.layout.collections {
            let path = paths::collection_tabular(&spec.name);
            let text = match reader.text(&path) {
                Ok(Some(text)) => text,
                Ok(None) => {
                    if spec.required {
                        return Err(Error::invalid_input(format!(
                            "archive has no {} file",
                            path
                        )));
                    }
                    debug!(collection = %spec.name, "no tabular file in archive");
                    report.details.insert(spec.name.clone(), CollectionCounts::default());
                    continue;
                }
                Err(e) => {
                    report.errors.push(format!("{}: {}", spec.name, e));
                    report.details.insert(spec.name.clone(), CollectionCounts::default());
                    continue;
                }
            };

            let table = match decode(text) {
                Ok(table) => table,
                Err(e) => {
                    report.errors.push(format!("{}: {}", spec.name, e));
                    report.details.insert(spec.name.clone(), CollectionCounts::default());
                    continue;
                }
            };

            let counts = self.merge_collection(spec, &table, &mut report.errors);
            report.details.insert(spec.name.clone(), counts);
        }

        info!(
            collections = report.details.len(),
            errors = report.errors.len(),
            "import finished"
        );
        Ok(report)
    }

    /// Accumulate per-row outcomes for one collection
    fn merge_collection(
        &self,
        spec: &CollectionSpec,
        table: &Table,
        errors: &mut Vec<String>,
    ) -> CollectionCounts {
        let mut counts = CollectionCounts::default();
        for (index, outcome) in merge_rows(self.records.as_ref(), spec, table) {
            match outcome {
                MergeOutcome::Inserted => counts.inserted += 1,
                MergeOutcome::Updated => counts.updated += 1,
                MergeOutcome::Skipped => counts.skipped += 1,
                MergeOutcome::Failed(reason) => {
                    counts.skipped += 1;
                    errors.push(format!("{} row {}: {}", spec.name, index + 1, reason));
                }
            }
        }
        counts
    }
}

/// Lazily merge every row of a decoded table, yielding per-row outcomes
///
/// Restartable only by re-decoding; the store side effects of consumed
/// items have already happened.
pub fn merge_rows<'a>(
    store: &'a dyn RecordStore,
    spec: &'a CollectionSpec,
    table: &'a Table,
) -> impl Iterator<Item = (usize, MergeOutcome)> + 'a {
    (0..table.rows.len()).map(move |index| (index, merge_row(store, spec, table, index)))
}

/// Merge a single row: insert if absent, else update or skip per policy
pub fn merge_row(
    store: &dyn RecordStore,
    spec: &CollectionSpec,
    table: &Table,
    index: usize,
) -> MergeOutcome {
    let record = table.record(index);
    let Some(key) = record
        .get(&spec.primary_key)
        .filter(|v| !v.is_null())
        .cloned()
    else {
        return MergeOutcome::Failed(format!("missing primary key '{}'", spec.primary_key));
    };

    match store.find_by_key(&spec.name, &spec.primary_key, &key) {
        Err(e) => MergeOutcome::Failed(e.to_string()),
        Ok(Some(_)) => match spec.merge {
            MergePolicy::SkipExisting => MergeOutcome::Skipped,
            MergePolicy::Update => {
                match store.update(&spec.name, &spec.primary_key, &key, record) {
                    Ok(()) => MergeOutcome::Updated,
                    Err(e) => MergeOutcome::Failed(e.to_string()),
                }
            }
        },
        Ok(None) => match store.insert(&spec.name, record) {
            Ok(()) => MergeOutcome::Inserted,
            Err(e) => MergeOutcome::Failed(e.to_string()),
        },
    }
}
