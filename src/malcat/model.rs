use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// The value the medium selector uses for "no restriction".
pub const ALL_MEDIA: &str = "all";

/// A row from one of the lookup tables (genre, studio, item type, ...).
///
/// Columns differ per table, so the row is kept as a JSON object and fields
/// are read by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceItem(Map<String, Value>);

impl ReferenceItem {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Reads a field as the string a selection control would carry.
    ///
    /// Missing and null fields read as the empty string.
    pub fn field_string(&self, field: &str) -> String {
        self.get(field).map(value_to_string).unwrap_or_default()
    }
}

impl From<Value> for ReferenceItem {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Which kind of record an insert targets. The endpoint is generic, so any
/// other type string passes through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordType {
    Anime,
    Manga,
    Other(String),
}

impl RecordType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "anime" => RecordType::Anime,
            "manga" => RecordType::Manga,
            other => RecordType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RecordType::Anime => "anime",
            RecordType::Manga => "manga",
            RecordType::Other(s) => s,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RecordType::from_name(s))
    }
}

/// Context for the cascading item-type filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediumContext {
    All,
    Medium(String),
}

impl MediumContext {
    pub fn parse(value: &str) -> Self {
        if value == ALL_MEDIA {
            MediumContext::All
        } else {
            MediumContext::Medium(value.to_string())
        }
    }

    pub fn admits(&self, medium: &str) -> bool {
        match self {
            MediumContext::All => true,
            MediumContext::Medium(m) => m == medium,
        }
    }
}

impl fmt::Display for MediumContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediumContext::All => f.write_str(ALL_MEDIA),
            MediumContext::Medium(m) => f.write_str(m),
        }
    }
}

/// One row of a search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub entry_id: u64,
    #[serde(default)]
    pub title_name: String,
    // Decimal columns come back as strings from some backends
    #[serde(default, deserialize_with = "lenient_string")]
    pub score: Option<String>,
    #[serde(default)]
    pub medium_type: Option<String>,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub volumes: Option<u32>,
    #[serde(default)]
    pub ranked: Option<u32>,
    #[serde(default)]
    pub popularity: Option<u32>,
    #[serde(default)]
    pub status_name: Option<String>,
    #[serde(default)]
    pub age_rating: Option<String>,
    #[serde(default)]
    pub premier_date_season: Option<String>,
    #[serde(default)]
    pub premier_date_year: Option<i32>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(v) => Some(value_to_string(&v)),
    })
}

/// Full detail of one entry, as returned for the edit view.
///
/// Subtype columns vary with the medium, so everything beyond the fields the
/// client branches on is kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryDetail {
    pub entry_id: u64,
    #[serde(default)]
    pub title_name: String,
    #[serde(default)]
    pub medium_type: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl EntryDetail {
    pub fn record_type(&self) -> Option<RecordType> {
        self.medium_type.as_deref().map(RecordType::from_name)
    }

    /// Reads a column as zero or more form values. Id lists expand into one
    /// value per element.
    pub fn field_values(&self, field: &str) -> Vec<String> {
        match field {
            "entry_id" => vec![self.entry_id.to_string()],
            "title_name" => vec![self.title_name.clone()],
            "medium_type" => self.medium_type.iter().cloned().collect(),
            _ => match self.fields.get(field) {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => items.iter().map(value_to_string).collect(),
                Some(v) => vec![value_to_string(v)],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_string_stringifies_numbers_and_blanks_nulls() {
        let item = ReferenceItem::from(json!({"genre_id": 7, "name": "Drama", "extra": null}));
        assert_eq!(item.field_string("genre_id"), "7");
        assert_eq!(item.field_string("name"), "Drama");
        assert_eq!(item.field_string("extra"), "");
        assert_eq!(item.field_string("missing"), "");
    }

    #[test]
    fn record_type_passes_unknown_types_through() {
        assert_eq!("anime".parse::<RecordType>().unwrap(), RecordType::Anime);
        let other: RecordType = "novel".parse().unwrap();
        assert_eq!(other.as_str(), "novel");
    }

    #[test]
    fn medium_context_all_admits_everything() {
        assert!(MediumContext::parse("all").admits("manga"));
        assert!(MediumContext::parse("manga").admits("manga"));
        assert!(!MediumContext::parse("manga").admits("anime"));
    }

    #[test]
    fn record_accepts_decimal_scores_as_strings_or_numbers() {
        let a: CatalogRecord =
            serde_json::from_value(json!({"entry_id": 1, "title_name": "A", "score": "8.50"}))
                .unwrap();
        let b: CatalogRecord =
            serde_json::from_value(json!({"entry_id": 2, "title_name": "B", "score": 7.25}))
                .unwrap();
        let c: CatalogRecord =
            serde_json::from_value(json!({"entry_id": 3, "title_name": "C", "score": null}))
                .unwrap();
        assert_eq!(a.score.as_deref(), Some("8.50"));
        assert_eq!(b.score.as_deref(), Some("7.25"));
        assert_eq!(c.score, None);
    }

    #[test]
    fn entry_detail_expands_id_lists() {
        let entry: EntryDetail = serde_json::from_value(json!({
            "entry_id": 4,
            "title_name": "Berserk",
            "medium_type": "manga",
            "volumes": 41,
            "genres": [1, 2],
            "chapters": null
        }))
        .unwrap();
        assert_eq!(entry.record_type(), Some(RecordType::Manga));
        assert_eq!(entry.field_values("genres"), vec!["1", "2"]);
        assert_eq!(entry.field_values("volumes"), vec!["41"]);
        assert!(entry.field_values("chapters").is_empty());
    }
}
