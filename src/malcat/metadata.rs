//! # Metadata Store
//!
//! Reference collections (statuses, item types, genres, studios, ...) fetched
//! once from `/api/metadata` and then shared read-only by every dropdown on a
//! page.
//!
//! The store is never mutated after construction. A reload builds a new
//! store and replaces the old one wholesale; see `commands::metadata`.

use crate::model::ReferenceItem;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// The named reference collections the backend serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    ItemType,
    StatusType,
    Source,
    AgeRating,
    Genre,
    Theme,
    Demographic,
    Studio,
    Producer,
    Licensor,
    Author,
    Serialization,
    Medium,
}

impl Collection {
    /// Key of the collection in the metadata bundle.
    pub fn name(self) -> &'static str {
        match self {
            Collection::ItemType => "ItemType",
            Collection::StatusType => "StatusType",
            Collection::Source => "Source",
            Collection::AgeRating => "AgeRating",
            Collection::Genre => "Genre",
            Collection::Theme => "Theme",
            Collection::Demographic => "Demographic",
            Collection::Studio => "Studio",
            Collection::Producer => "Producer",
            Collection::Licensor => "Licensor",
            Collection::Author => "Author",
            Collection::Serialization => "Serialization",
            Collection::Medium => "Medium",
        }
    }

    pub fn value_field(self) -> &'static str {
        match self {
            Collection::ItemType => "item_type_id",
            Collection::StatusType => "status_id",
            Collection::Source => "source_id",
            Collection::AgeRating => "age_rating_id",
            Collection::Genre => "genre_id",
            Collection::Theme => "theme_id",
            Collection::Demographic => "demographic_id",
            Collection::Studio => "studio_id",
            Collection::Producer => "producer_id",
            Collection::Licensor => "licensor_id",
            Collection::Author => "author_id",
            Collection::Serialization => "serialization_id",
            Collection::Medium => "medium_id",
        }
    }

    pub fn label_field(self) -> &'static str {
        match self {
            Collection::ItemType => "type_name",
            Collection::StatusType => "status_name",
            Collection::Source => "source_name",
            Collection::AgeRating => "code",
            Collection::Author => "display_name",
            _ => "name",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Attribute of an `ItemType` row naming its medium.
pub const ITEM_TYPE_MEDIUM_FIELD: &str = "medium_type";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, Value>")]
pub struct MetadataStore {
    collections: BTreeMap<String, Vec<ReferenceItem>>,
}

impl From<BTreeMap<String, Value>> for MetadataStore {
    fn from(bundle: BTreeMap<String, Value>) -> Self {
        // Anything that is not a list of rows is not a collection
        let collections = bundle
            .into_iter()
            .filter_map(|(name, value)| match value {
                Value::Array(rows) => {
                    Some((name, rows.into_iter().map(ReferenceItem::from).collect()))
                }
                _ => None,
            })
            .collect();
        Self { collections }
    }
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(mut self, name: &str, items: Vec<ReferenceItem>) -> Self {
        self.collections.insert(name.to_string(), items);
        self
    }

    /// Items of a collection, or an empty slice if the bundle lacked it.
    pub fn items(&self, collection: Collection) -> &[ReferenceItem] {
        self.items_by_name(collection.name())
    }

    pub fn items_by_name(&self, name: &str) -> &[ReferenceItem] {
        self.collections
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
