//! Collection registry
//!
//! The backup job and the importer never discover collections dynamically:
//! both walk a fixed [`StoreLayout`] mapping collection names to their
//! primary-key column and merge policy. This keeps an uploaded archive from
//! importing collections the target store does not expect.

use serde::{Deserialize, Serialize};

/// Merge behavior for rows that already exist in the target collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Overwrite the existing row with the archived one (contact-style data)
    Update,
    /// Leave the existing row untouched (immutable document metadata)
    SkipExisting,
}

/// One registered record collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSpec {
    /// Collection name as known to the record store
    pub name: String,
    /// Primary identifier column used for existence checks on import
    pub primary_key: String,
    /// What to do when an imported row already exists
    pub merge: MergePolicy,
    /// Whether an import without this collection's tabular file is rejected
    pub required: bool,
}

impl CollectionSpec {
    /// Registered collection whose rows are overwritten on re-import
    pub fn updatable(name: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: primary_key.into(),
            merge: MergePolicy::Update,
            required: false,
        }
    }

    /// Registered collection whose existing rows are never touched
    pub fn immutable(name: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: primary_key.into(),
            merge: MergePolicy::SkipExisting,
            required: false,
        }
    }

    /// Mark this collection's tabular file as mandatory for imports
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// The fixed set of collections and containers a store exposes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreLayout {
    /// Record collections, in restoration order
    pub collections: Vec<CollectionSpec>,
    /// Blob containers to harvest
    pub containers: Vec<String>,
}

impl StoreLayout {
    /// Layout of the rental-platform store
    ///
    /// Contact requests carry follow-up state and are overwritten on
    /// re-import; lead documents are immutable upload metadata and are
    /// skipped when already present.
    pub fn rental_site() -> Self {
        Self {
            collections: vec![
                CollectionSpec::updatable("contact_requests", "id").required(),
                CollectionSpec::immutable("lead_documents", "id"),
            ],
            containers: vec!["lead-uploads".to_string(), "property-images".to_string()],
        }
    }

    /// Look up a registered collection by name
    pub fn collection(&self, name: &str) -> Option<&CollectionSpec> {
        self.collections.iter().find(|c| c.name == name)
    }

    /// Names of all registered collections, in restoration order
    pub fn collection_names(&self) -> Vec<String> {
        self.collections.iter().map(|c| c.name.clone()).collect()
    }
}

impl Default for StoreLayout {
    fn default() -> Self {
        Self::rental_site()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rental_site_layout() {
        let layout = StoreLayout::rental_site();
        assert_eq!(layout.collections.len(), 2);
        assert_eq!(layout.containers.len(), 2);

        let contacts = layout.collection("contact_requests").unwrap();
        assert_eq!(contacts.merge, MergePolicy::Update);
        assert!(contacts.required);

        let documents = layout.collection("lead_documents").unwrap();
        assert_eq!(documents.merge, MergePolicy::SkipExisting);
        assert!(!documents.required);
    }

    #[test]
    fn test_collection_lookup_miss() {
        let layout = StoreLayout::rental_site();
        assert!(layout.collection("unknown").is_none());
    }

    #[test]
    fn test_collection_names_order() {
        let layout = StoreLayout::rental_site();
        assert_eq!(
            layout.collection_names(),
            vec!["contact_requests".to_string(), "lead_documents".to_string()]
        );
    }
}
