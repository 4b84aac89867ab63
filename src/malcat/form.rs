//! # Form Payloads
//!
//! A submitted form is an ordered list of `(name, value)` entries in which a
//! name may repeat (multi-selects contribute one entry per selected option).
//! [`FormPayload::build`] folds those entries into the JSON body the insert
//! and update endpoints expect:
//!
//! - a `Multi` field becomes an array of its values,
//! - a `Single` field becomes its value, or `null` when the value is empty;
//!   more than one entry for it is rejected,
//! - a field the schema does not declare is judged by its entry count: more
//!   than one value gives an array, otherwise the single-value rule applies.

use crate::error::{CatalogError, Result};
use crate::model::{EntryDetail, RecordType};
use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    Multi,
}

/// Declared cardinality of each form field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSchema {
    fields: Vec<(String, Cardinality)>,
}

impl FormSchema {
    /// A schema that declares nothing; every field is judged by entry count.
    pub fn inferred() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, cardinality: Cardinality) -> Self {
        self.fields.retain(|(n, _)| n != name);
        self.fields.push((name.to_string(), cardinality));
        self
    }

    pub fn single(self, names: &[&str]) -> Self {
        names
            .iter()
            .fold(self, |schema, name| schema.field(name, Cardinality::Single))
    }

    pub fn multi(self, names: &[&str]) -> Self {
        names
            .iter()
            .fold(self, |schema, name| schema.field(name, Cardinality::Multi))
    }

    pub fn cardinality(&self, name: &str) -> Option<Cardinality> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| *c)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// Insert/edit form of an anime entry.
    pub fn anime() -> Self {
        Self::inferred()
            .single(&[
                "mal_id",
                "title_name",
                "score",
                "item_type_id",
                "episodes",
                "status_id",
                "source_id",
                "age_rating_id",
                "season",
                "year",
                "broadcast_day",
                "duration_minutes",
            ])
            .multi(&[
                "genres",
                "themes",
                "demographics",
                "studios",
                "producers",
                "licensors",
            ])
    }

    /// Insert/edit form of a manga entry.
    pub fn manga() -> Self {
        Self::inferred()
            .single(&[
                "mal_id",
                "title_name",
                "score",
                "item_type_id",
                "volumes",
                "chapters",
                "status_id",
            ])
            .multi(&[
                "genres",
                "themes",
                "demographics",
                "authors",
                "serializations",
            ])
    }

    pub fn for_record_type(record_type: &RecordType) -> Self {
        match record_type {
            RecordType::Anime => Self::anime(),
            RecordType::Manga => Self::manga(),
            RecordType::Other(_) => Self::inferred(),
        }
    }

    /// Edit form schema. The update endpoint names the premiere columns after
    /// the table, and needs the medium to pick the detail table.
    pub fn edit_for_record_type(record_type: &RecordType) -> Self {
        let schema = Self::for_record_type(record_type)
            .single(&["medium_type", "description"]);
        match record_type {
            RecordType::Anime => schema.single(&["premier_date_year", "premier_date_season"]),
            _ => schema,
        }
    }
}

/// The entries of a form, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(name, value);
        self
    }

    /// Parses `name=value` pairs. Only the first `=` separates.
    pub fn parse_pair(pair: &str) -> Option<(String, String)> {
        let (name, value) = pair.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some((name.to_string(), value.to_string()))
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field names with duplicates removed, in first-appearance order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for (name, _) in &self.entries {
            if !keys.contains(&name.as_str()) {
                keys.push(name);
            }
        }
        keys
    }

    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Empties every field while keeping the fields themselves.
    pub fn reset(&mut self) {
        let mut seen = Vec::new();
        self.entries.retain(|(name, _)| {
            if seen.contains(name) {
                false
            } else {
                seen.push(name.clone());
                true
            }
        });
        for (_, value) in &mut self.entries {
            value.clear();
        }
    }

    /// Pre-fills a form from an existing entry, one entry per schema field.
    pub fn from_entry(entry: &EntryDetail, schema: &FormSchema) -> Self {
        let mut form = Self::new();
        for name in schema.field_names() {
            let values = entry.field_values(name);
            match schema.cardinality(name) {
                Some(Cardinality::Multi) => {
                    for value in values {
                        form.append(name, value);
                    }
                }
                _ => form.append(name, values.into_iter().next().unwrap_or_default()),
            }
        }
        form
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadValue {
    Null,
    Text(String),
    List(Vec<String>),
}

impl Serialize for PayloadValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            PayloadValue::Null => serializer.serialize_none(),
            PayloadValue::Text(s) => serializer.serialize_str(s),
            PayloadValue::List(items) => items.serialize(serializer),
        }
    }
}

/// JSON body of an insert or update request. Serializes as an object whose
/// keys keep form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    fields: Vec<(String, PayloadValue)>,
}

impl FormPayload {
    /// Fails with `InvalidInput` when a `Single` field carries more than one
    /// value.
    pub fn build(form: &FormData, schema: &FormSchema) -> Result<Self> {
        let mut fields = Vec::new();
        for name in form.keys() {
            let values = form.get_all(name);
            let value = match schema.cardinality(name) {
                Some(Cardinality::Multi) => PayloadValue::List(
                    values
                        .into_iter()
                        .filter(|v| !v.is_empty())
                        .map(str::to_string)
                        .collect(),
                ),
                Some(Cardinality::Single) if values.len() > 1 => {
                    return Err(CatalogError::InvalidInput(format!(
                        "{} takes one value",
                        name
                    )));
                }
                Some(Cardinality::Single) => single_value(values.first().copied()),
                None if values.len() > 1 => {
                    PayloadValue::List(values.into_iter().map(str::to_string).collect())
                }
                None => single_value(values.first().copied()),
            };
            fields.push((name.to_string(), value));
        }
        Ok(Self { fields })
    }

    pub fn get(&self, name: &str) -> Option<&PayloadValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn single_value(value: Option<&str>) -> PayloadValue {
    match value {
        None | Some("") => PayloadValue::Null,
        Some(v) => PayloadValue::Text(v.to_string()),
    }
}

impl Serialize for FormPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
