//! # Backend Layer
//!
//! The catalog lives behind a REST backend. [`CatalogBackend`] is the client's
//! view of it: one method per endpoint, typed inputs, typed outputs.
//!
//! ## Implementations
//!
//! - [`http::HttpBackend`]: production client over reqwest
//! - [`memory::InMemoryBackend`]: in-process stand-in for testing, with
//!   request recording and failure injection
//!
//! ## Error Contract
//!
//! Every method distinguishes two failure classes:
//!
//! - `CatalogError::Transport` / `CatalogError::Decode`: no usable answer
//! - `CatalogError::Server { status, message }`: the backend refused, and
//!   `message` is its `{error}` text, verbatim
//!
//! Callers decide what to show; the backend only reports.

use crate::error::Result;
use crate::form::FormPayload;
use crate::metadata::MetadataStore;
use crate::model::{CatalogRecord, EntryDetail, RecordType};

pub mod http;
pub mod memory;

/// Abstract interface to the catalog backend.
pub trait CatalogBackend {
    /// `GET /api/metadata`: every reference collection
    fn fetch_metadata(&self) -> Result<MetadataStore>;

    /// `GET /api/search`: records matching the query pairs
    fn search(&self, query: &[(&str, String)]) -> Result<Vec<CatalogRecord>>;

    /// `DELETE /api/delete/:id`: the server's confirmation message
    fn delete_entry(&mut self, id: u64) -> Result<String>;

    /// `POST /api/update_score/:id`: the server's confirmation message
    fn update_score(&mut self, id: u64, score: &str) -> Result<String>;

    /// `POST /api/insert/:type`: the id of the new entry
    fn insert(&mut self, record_type: &RecordType, payload: &FormPayload) -> Result<u64>;

    /// `GET /api/entry/:id`: full detail for the edit view
    fn get_entry(&self, id: u64) -> Result<EntryDetail>;

    /// `POST /api/update/:id`: the server's confirmation message
    fn update_entry(&mut self, id: u64, payload: &FormPayload) -> Result<String>;
}
