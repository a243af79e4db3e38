//! Record-collection serialization
//!
//! Turns one collection's records into the three artifacts stored under
//! `database/` in the archive. Pure: no store access, no logging — the
//! engine decides what records to pass in (and passes an empty slice when
//! the collection read failed, so the job keeps progressing).

use crate::error::ArchiveResult;
use rentvault_codec::tabular::Table;
use rentvault_codec::{encode, render_insert_statements};
use rentvault_core::Record;

/// The three renderings of one collection
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionArtifacts {
    /// Collection name
    pub name: String,
    /// Delimited text, read back by the merge importer
    pub tabular: String,
    /// INSERT statements for manual restore
    pub sql: String,
    /// Indented JSON for inspection
    pub structured: String,
}

/// Serialize a collection's records into archive artifacts
///
/// A collection with zero records produces an empty tabular file, an empty
/// SQL file and an empty JSON array.
///
/// # Errors
///
/// Returns an error only if JSON rendering fails.
pub fn serialize_collection(name: &str, records: &[Record]) -> ArchiveResult<CollectionArtifacts> {
    let table = Table::from_records(records);
    let tabular = encode(&table);
    let sql = render_insert_statements(name, &table.columns, records);
    let structured = serde_json::to_string_pretty(records)?;

    Ok(CollectionArtifacts {
        name: name.to_string(),
        tabular,
        sql,
        structured,
    })
}

/// Contents of `database/README.txt`
///
/// Collections are listed in restoration order (the registry order).
pub fn restore_notes(collections: &[String]) -> String {
    let mut out = String::from(
        "Restore order\n\
         =============\n\n\
         Apply the .sql files in the order below, then re-upload the\n\
         contents of storage/ into the matching containers:\n\n",
    );
    for (i, name) in collections.iter().enumerate() {
        out.push_str(&format!("  {}. {}.sql\n", i + 1, name));
    }
    out.push_str(
        "\nThe .csv files are the canonical input for the merge importer;\n\
         the .json files are for inspection only.\n",
    );
    out
}
