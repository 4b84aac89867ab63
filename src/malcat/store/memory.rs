use super::CatalogBackend;
use crate::error::{CatalogError, Result};
use crate::form::{FormPayload, PayloadValue};
use crate::metadata::MetadataStore;
use crate::model::{CatalogRecord, EntryDetail, RecordType};
use crate::search::encode_query;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

/// Endpoints of the backend, for failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Metadata,
    Search,
    Delete,
    UpdateScore,
    Insert,
    Entry,
    Update,
}

/// A failure to report instead of serving a request.
#[derive(Debug, Clone)]
pub enum Failure {
    /// Connection-level failure; no response.
    Transport,
    /// A response with this status and `{error}` message.
    Server(u16, String),
}

impl Failure {
    fn to_error(&self) -> CatalogError {
        match self {
            Failure::Transport => CatalogError::Transport("connection refused".to_string()),
            Failure::Server(status, message) => CatalogError::Server {
                status: *status,
                message: message.clone(),
            },
        }
    }
}

/// In-memory backend for testing and development.
/// Does NOT persist data.
///
/// Search honours `title` (case-insensitive substring), `medium`,
/// `score_min` and `limit`; other filters are accepted and ignored.
/// Every request is recorded as `"METHOD /path"`.
#[derive(Default)]
pub struct InMemoryBackend {
    metadata: MetadataStore,
    entries: BTreeMap<u64, EntryDetail>,
    next_id: u64,
    failures: HashMap<Endpoint, Failure>,
    requests: RefCell<Vec<String>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    pub fn with_metadata(mut self, metadata: MetadataStore) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_record(mut self, record: CatalogRecord) -> Self {
        self.next_id = self.next_id.max(record.entry_id + 1);
        self.entries.insert(record.entry_id, entry_from_record(&record));
        self
    }

    /// Makes every request to `endpoint` fail until [`Self::recover`].
    pub fn fail(&mut self, endpoint: Endpoint, failure: Failure) {
        self.failures.insert(endpoint, failure);
    }

    pub fn recover(&mut self, endpoint: Endpoint) {
        self.failures.remove(&endpoint);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self, prefix: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.starts_with(prefix))
            .count()
    }

    pub fn entry(&self, id: u64) -> Option<&EntryDetail> {
        self.entries.get(&id)
    }

    fn record(&self, endpoint: Endpoint, request: String) -> Result<()> {
        self.requests.borrow_mut().push(request);
        match self.failures.get(&endpoint) {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }

    fn not_found(message: &str) -> CatalogError {
        CatalogError::Server {
            status: 404,
            message: message.to_string(),
        }
    }
}

fn entry_from_record(record: &CatalogRecord) -> EntryDetail {
    let mut fields = match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    fields.remove("entry_id");
    fields.remove("title_name");
    fields.remove("medium_type");
    EntryDetail {
        entry_id: record.entry_id,
        title_name: record.title_name.clone(),
        medium_type: record.medium_type.clone(),
        fields,
    }
}

fn record_from_entry(entry: &EntryDetail) -> CatalogRecord {
    let mut object = entry.fields.clone();
    object.insert("entry_id".into(), entry.entry_id.into());
    object.insert("title_name".into(), entry.title_name.clone().into());
    if let Some(medium) = &entry.medium_type {
        object.insert("medium_type".into(), medium.clone().into());
    }
    serde_json::from_value(Value::Object(object)).unwrap_or_else(|_| CatalogRecord {
        entry_id: entry.entry_id,
        title_name: entry.title_name.clone(),
        medium_type: entry.medium_type.clone(),
        ..Default::default()
    })
}

fn payload_to_json(value: &PayloadValue) -> Value {
    match value {
        PayloadValue::Null => Value::Null,
        PayloadValue::Text(s) => s
            .parse::<u64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::from(s.as_str())),
        PayloadValue::List(items) => Value::Array(
            items
                .iter()
                .map(|s| s.parse::<u64>().map(Value::from).unwrap_or_else(|_| Value::from(s.as_str())))
                .collect(),
        ),
    }
}

fn required_title(payload: &FormPayload) -> Result<String> {
    match payload.get("title_name") {
        Some(PayloadValue::Text(title)) => Ok(title.clone()),
        _ => Err(CatalogError::Server {
            status: 400,
            message: "Column 'title_name' cannot be null".to_string(),
        }),
    }
}

fn apply_payload(entry: &mut EntryDetail, payload: &FormPayload, names: &[&str]) {
    for name in names {
        if let Some(value) = payload.get(name) {
            entry.fields.insert(name.to_string(), payload_to_json(value));
        }
    }
}

const DETAIL_FIELDS: [&str; 20] = [
    "mal_id",
    "score",
    "description",
    "item_type_id",
    "episodes",
    "volumes",
    "chapters",
    "status_id",
    "source_id",
    "age_rating_id",
    "premier_date_year",
    "premier_date_season",
    "duration_minutes",
    "genres",
    "themes",
    "demographics",
    "studios",
    "producers",
    "licensors",
    "authors",
];

impl CatalogBackend for InMemoryBackend {
    fn fetch_metadata(&self) -> Result<MetadataStore> {
        self.record(Endpoint::Metadata, "GET /api/metadata".into())?;
        Ok(self.metadata.clone())
    }

    fn search(&self, query: &[(&str, String)]) -> Result<Vec<CatalogRecord>> {
        self.record(
            Endpoint::Search,
            format!("GET /api/search?{}", encode_query(query)),
        )?;

        let param = |key: &str| {
            query
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str())
        };
        let title = param("title").map(str::to_lowercase);
        let medium = param("medium");
        let score_min = param("score_min").and_then(|s| s.parse::<f64>().ok());
        let limit = param("limit")
            .and_then(|l| l.parse::<usize>().ok())
            .unwrap_or(50);

        Ok(self
            .entries
            .values()
            .map(record_from_entry)
            .filter(|r| {
                title
                    .as_ref()
                    .is_none_or(|t| r.title_name.to_lowercase().contains(t))
            })
            .filter(|r| medium.is_none_or(|m| r.medium_type.as_deref() == Some(m)))
            .filter(|r| {
                score_min.is_none_or(|min| {
                    r.score
                        .as_deref()
                        .and_then(|s| s.parse::<f64>().ok())
                        .is_some_and(|s| s >= min)
                })
            })
            .take(limit)
            .collect())
    }

    fn delete_entry(&mut self, id: u64) -> Result<String> {
        self.record(Endpoint::Delete, format!("DELETE /api/delete/{}", id))?;
        match self.entries.remove(&id) {
            Some(_) => Ok("Deleted successfully".to_string()),
            None => Err(Self::not_found("Entry not found")),
        }
    }

    fn update_score(&mut self, id: u64, score: &str) -> Result<String> {
        self.record(
            Endpoint::UpdateScore,
            format!("POST /api/update_score/{}", id),
        )?;
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.fields.insert("score".into(), Value::from(score));
        }
        Ok("Score updated".to_string())
    }

    fn insert(&mut self, record_type: &RecordType, payload: &FormPayload) -> Result<u64> {
        self.record(Endpoint::Insert, format!("POST /api/insert/{}", record_type))?;
        let title = required_title(payload)?;

        let id = self.next_id.max(1);
        self.next_id = id + 1;

        let mut entry = EntryDetail {
            entry_id: id,
            title_name: title,
            medium_type: Some(record_type.to_string()),
            fields: Map::new(),
        };
        apply_payload(&mut entry, payload, &DETAIL_FIELDS);
        apply_payload(&mut entry, payload, &["serializations"]);
        self.entries.insert(id, entry);
        Ok(id)
    }

    fn get_entry(&self, id: u64) -> Result<EntryDetail> {
        self.record(Endpoint::Entry, format!("GET /api/entry/{}", id))?;
        self.entries
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::not_found("Not Found"))
    }

    fn update_entry(&mut self, id: u64, payload: &FormPayload) -> Result<String> {
        self.record(Endpoint::Update, format!("POST /api/update/{}", id))?;
        let title = required_title(payload)?;
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or_else(|| Self::not_found("Not Found"))?;
        entry.title_name = title;
        apply_payload(entry, payload, &DETAIL_FIELDS);
        apply_payload(entry, payload, &["serializations"]);
        Ok("Update Successful".to_string())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::ReferenceItem;
    use serde_json::json;

    fn items(rows: Value) -> Vec<ReferenceItem> {
        match rows {
            Value::Array(rows) => rows.into_iter().map(ReferenceItem::from).collect(),
            _ => Vec::new(),
        }
    }

    /// A small but complete metadata bundle.
    pub fn sample_metadata() -> MetadataStore {
        MetadataStore::new()
            .with_collection(
                "ItemType",
                items(json!([
                    {"item_type_id": 1, "type_name": "Manga", "medium_type": "manga"},
                    {"item_type_id": 2, "type_name": "Movie", "medium_type": "anime"},
                    {"item_type_id": 3, "type_name": "Novel", "medium_type": "manga"},
                    {"item_type_id": 4, "type_name": "TV", "medium_type": "anime"}
                ])),
            )
            .with_collection(
                "StatusType",
                items(json!([
                    {"status_id": 1, "status_name": "Finished"},
                    {"status_id": 2, "status_name": "Publishing"}
                ])),
            )
            .with_collection(
                "Source",
                items(json!([{"source_id": 1, "source_name": "Original"}])),
            )
            .with_collection(
                "AgeRating",
                items(json!([{"age_rating_id": 1, "code": "PG-13"}])),
            )
            .with_collection(
                "Genre",
                items(json!([
                    {"genre_id": 1, "name": "Action"},
                    {"genre_id": 2, "name": "Drama"}
                ])),
            )
            .with_collection("Theme", items(json!([{"theme_id": 1, "name": "Space"}])))
            .with_collection(
                "Demographic",
                items(json!([{"demographic_id": 1, "name": "Seinen"}])),
            )
            .with_collection("Studio", items(json!([{"studio_id": 1, "name": "Sunrise"}])))
            .with_collection(
                "Producer",
                items(json!([{"producer_id": 1, "name": "Bandai"}])),
            )
            .with_collection(
                "Licensor",
                items(json!([{"licensor_id": 1, "name": "Funimation"}])),
            )
            .with_collection(
                "Author",
                items(json!([{"author_id": 1, "display_name": "Miura, Kentarou"}])),
            )
            .with_collection(
                "Serialization",
                items(json!([{"serialization_id": 1, "name": "Young Animal"}])),
            )
    }

    pub fn sample_records() -> Vec<CatalogRecord> {
        vec![
            CatalogRecord {
                entry_id: 1,
                title_name: "Cowboy Bebop".into(),
                score: Some("8.75".into()),
                medium_type: Some("anime".into()),
                type_name: Some("TV".into()),
                episodes: Some(26),
                premier_date_year: Some(1998),
                premier_date_season: Some("spring".into()),
                ..Default::default()
            },
            CatalogRecord {
                entry_id: 2,
                title_name: "Berserk".into(),
                score: Some("9.47".into()),
                medium_type: Some("manga".into()),
                type_name: Some("Manga".into()),
                status_name: Some("Publishing".into()),
                ..Default::default()
            },
        ]
    }

    pub struct BackendFixture {
        pub backend: InMemoryBackend,
    }

    impl Default for BackendFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl BackendFixture {
        pub fn new() -> Self {
            let backend = sample_records()
                .into_iter()
                .fold(InMemoryBackend::new(), InMemoryBackend::with_record)
                .with_metadata(sample_metadata());
            Self { backend }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::BackendFixture;
    use super::*;
    use crate::form::{FormData, FormSchema};

    #[test]
    fn search_filters_by_title_and_medium() {
        let fixture = BackendFixture::new();
        let hits = fixture
            .backend
            .search(&[("title", "bebop".into()), ("limit", "50".into())])
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entry_id, 1);

        let manga = fixture
            .backend
            .search(&[("medium", "manga".into())])
            .unwrap();
        assert_eq!(manga.len(), 1);
        assert_eq!(manga[0].title_name, "Berserk");
    }

    #[test]
    fn search_applies_score_min_and_limit() {
        let fixture = BackendFixture::new();
        let hits = fixture
            .backend
            .search(&[("score_min", "9".into())])
            .unwrap();
        assert_eq!(hits.len(), 1);

        let limited = fixture.backend.search(&[("limit", "1".into())]).unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn requests_are_recorded() {
        let fixture = BackendFixture::new();
        fixture.backend.search(&[("limit", "50".into())]).unwrap();
        assert_eq!(fixture.backend.requests(), vec!["GET /api/search?limit=50"]);
    }

    #[test]
    fn delete_missing_entry_is_not_found() {
        let mut backend = InMemoryBackend::new();
        match backend.delete_entry(7) {
            Err(CatalogError::Server { status: 404, message }) => {
                assert_eq!(message, "Entry not found")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn insert_assigns_next_id_and_requires_title() {
        let mut fixture = BackendFixture::new();
        let form = FormData::new()
            .with("title_name", "Planetes")
            .with("genres", "2");
        let payload = FormPayload::build(&form, &FormSchema::anime()).unwrap();
        let id = fixture.backend.insert(&RecordType::Anime, &payload).unwrap();
        assert_eq!(id, 3);
        assert_eq!(
            fixture.backend.entry(3).unwrap().field_values("genres"),
            vec!["2"]
        );

        let untitled = FormPayload::build(
            &FormData::new().with("title_name", ""),
            &FormSchema::anime(),
        )
        .unwrap();
        assert!(matches!(
            fixture.backend.insert(&RecordType::Anime, &untitled),
            Err(CatalogError::Server { status: 400, .. })
        ));
    }

    #[test]
    fn injected_failures_still_record_the_request() {
        let mut backend = InMemoryBackend::new();
        backend.fail(Endpoint::Metadata, Failure::Transport);
        assert!(backend.fetch_metadata().unwrap_err().is_transport());
        assert_eq!(backend.request_count("GET /api/metadata"), 1);

        backend.recover(Endpoint::Metadata);
        assert!(backend.fetch_metadata().is_ok());
    }
}
