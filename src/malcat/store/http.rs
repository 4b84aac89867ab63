use super::CatalogBackend;
use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use crate::form::FormPayload;
use crate::metadata::MetadataStore;
use crate::model::{CatalogRecord, EntryDetail, RecordType};
use crate::search::encode_query;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Backend client talking JSON over HTTP.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct MessageReply {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct InsertReply {
    entry_id: u64,
}

#[derive(Deserialize)]
struct ErrorReply {
    error: String,
}

impl HttpBackend {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        Url::parse(&config.api_url).map_err(|e| {
            CatalogError::Config(format!("Invalid api-url '{}': {}", config.api_url, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("malcat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an API path. Keeps any path prefix of the base URL.
    fn endpoint(&self, path: &str) -> Result<Url> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| CatalogError::Config(format!("Invalid URL '{}': {}", raw, e)))
    }

    fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "backend response");

        let body = response
            .text()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| CatalogError::Decode(e.to_string()))
        } else {
            Err(server_error(status.as_u16(), &body))
        }
    }
}

/// The backend reports failures as `{"error": "..."}`; anything else is
/// summarized by status.
fn server_error(status: u16, body: &str) -> CatalogError {
    let message = serde_json::from_str::<ErrorReply>(body)
        .map(|reply| reply.error)
        .unwrap_or_else(|_| format!("HTTP {}", status));
    CatalogError::Server { status, message }
}

impl CatalogBackend for HttpBackend {
    fn fetch_metadata(&self) -> Result<MetadataStore> {
        let url = self.endpoint("/api/metadata")?;
        self.fetch(self.client.get(url))
    }

    fn search(&self, query: &[(&str, String)]) -> Result<Vec<CatalogRecord>> {
        let mut url = self.endpoint("/api/search")?;
        url.set_query(Some(&encode_query(query)));
        debug!(%url, "search");
        self.fetch(self.client.get(url))
    }

    fn delete_entry(&mut self, id: u64) -> Result<String> {
        let url = self.endpoint(&format!("/api/delete/{}", id))?;
        let reply: MessageReply = self.fetch(self.client.delete(url))?;
        Ok(reply.message)
    }

    fn update_score(&mut self, id: u64, score: &str) -> Result<String> {
        let url = self.endpoint(&format!("/api/update_score/{}", id))?;
        let body = serde_json::json!({ "score": score });
        let reply: MessageReply = self.fetch(self.client.post(url).json(&body))?;
        Ok(reply.message)
    }

    fn insert(&mut self, record_type: &RecordType, payload: &FormPayload) -> Result<u64> {
        let mut url = self.endpoint("/api/insert/")?;
        url.path_segments_mut()
            .map_err(|_| CatalogError::Config(format!("Cannot build insert URL from {}", self.base_url)))?
            .pop_if_empty()
            .push(record_type.as_str());
        let reply: InsertReply = self.fetch(self.client.post(url).json(payload))?;
        Ok(reply.entry_id)
    }

    fn get_entry(&self, id: u64) -> Result<EntryDetail> {
        let url = self.endpoint(&format!("/api/entry/{}", id))?;
        self.fetch(self.client.get(url))
    }

    fn update_entry(&mut self, id: u64, payload: &FormPayload) -> Result<String> {
        let url = self.endpoint(&format!("/api/update/{}", id))?;
        let reply: MessageReply = self.fetch(self.client.post(url).json(payload))?;
        Ok(reply.message)
    }
}
