//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every catalog operation, whatever UI sits on top.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns the session state**: backend, configuration, the loaded metadata
//!   and the search session (results display and last filters)
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (record type names, medium contexts, schemas)
//! - **Returns structured types** (`CmdResult`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **I/O operations**: no stdout, stderr, or terminal formatting
//!
//! ## Generic Over CatalogBackend
//!
//! `CatalogApi<B: CatalogBackend>` is generic over the backend:
//! - Production: `CatalogApi<HttpBackend>`
//! - Testing: `CatalogApi<InMemoryBackend>`

use crate::commands::{self, CmdResult, Prompter};
use crate::config::CatalogConfig;
use crate::error::Result;
use crate::form::{FormData, FormSchema};
use crate::metadata::MetadataStore;
use crate::model::{EntryDetail, MediumContext, RecordType};
use crate::search::{SearchFilters, SearchSession};
use crate::store::CatalogBackend;
use crate::view::{PageKind, PageView, ResultsView};
use std::sync::Arc;

/// The main API facade for catalog operations.
pub struct CatalogApi<B: CatalogBackend> {
    backend: B,
    config: CatalogConfig,
    metadata: Arc<MetadataStore>,
    session: SearchSession,
}

impl<B: CatalogBackend> CatalogApi<B> {
    pub fn new(backend: B, config: CatalogConfig) -> Self {
        Self {
            backend,
            config,
            metadata: Arc::new(MetadataStore::new()),
            session: SearchSession::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// The metadata currently in use. Empty until the first successful load.
    pub fn metadata(&self) -> Arc<MetadataStore> {
        Arc::clone(&self.metadata)
    }

    /// Fetches the metadata bundle, keeping the previous one on failure.
    pub fn load_metadata(&mut self) -> Arc<MetadataStore> {
        self.metadata = commands::metadata::load(&self.backend, &self.metadata);
        self.metadata()
    }

    /// A page with every dropdown populated from the current metadata.
    pub fn page(&self, kind: PageKind) -> CmdResult {
        commands::metadata::page(kind, &self.metadata)
    }

    /// Reacts to a change of the medium selector on `page`.
    pub fn select_medium(&self, page: &mut PageView, medium: &str) {
        commands::cascade::apply_medium_filter(page, &self.metadata, &MediumContext::parse(medium));
    }

    pub fn search(&mut self, filters: &SearchFilters) -> CmdResult {
        commands::search::run(
            &self.backend,
            &mut self.session,
            filters,
            self.config.default_limit,
        )
    }

    /// Filters that the refresh after a delete or score update will use.
    pub fn restore_filters(&mut self, filters: SearchFilters) {
        self.session.set_last_filters(filters);
    }

    pub fn results(&self) -> &ResultsView {
        self.session.displayed()
    }

    pub fn delete_entry<P: Prompter>(&mut self, id: u64, prompter: &mut P) -> CmdResult {
        commands::delete::run(
            &mut self.backend,
            &mut self.session,
            prompter,
            id,
            self.config.default_limit,
        )
    }

    pub fn update_score(&mut self, id: u64, input: Option<&str>) -> CmdResult {
        commands::score::run(
            &mut self.backend,
            &mut self.session,
            id,
            input,
            self.config.default_limit,
        )
    }

    /// Inserts `form` as a new entry of the named record type, using the
    /// form schema of that type.
    pub fn submit(&mut self, record_type: &str, form: FormData) -> CmdResult {
        let record_type = RecordType::from_name(record_type);
        let schema = FormSchema::for_record_type(&record_type);
        commands::submit::run(&mut self.backend, &record_type, form, &schema)
    }

    pub fn get_entry(&self, id: u64) -> Result<CmdResult> {
        commands::entry::get(&self.backend, id)
    }

    pub fn edit_form(&self, entry: &EntryDetail) -> FormData {
        commands::entry::edit_form(entry)
    }

    /// Posts a complete edit form for entry `id`.
    pub fn update_entry(&mut self, id: u64, entry: &EntryDetail, form: &FormData) -> CmdResult {
        let schema = commands::entry::edit_schema(entry);
        commands::entry::update(&mut self.backend, id, form, &schema)
    }

    /// Applies `changes` over the current values of entry `id`.
    pub fn edit_entry(&mut self, id: u64, changes: &FormData) -> Result<CmdResult> {
        commands::entry::edit(&mut self.backend, id, changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::AutoPrompter;
    use crate::store::memory::fixtures::BackendFixture;
    use crate::view::ControlId;

    fn api() -> CatalogApi<crate::store::memory::InMemoryBackend> {
        CatalogApi::new(BackendFixture::new().backend, CatalogConfig::default())
    }

    #[test]
    fn page_is_empty_until_metadata_loads() {
        let mut api = api();
        let before = api.page(PageKind::Search).page.unwrap();
        assert_eq!(
            before.dropdown(ControlId::SearchGenre).unwrap().options().len(),
            1
        );

        api.load_metadata();
        let after = api.page(PageKind::Search).page.unwrap();
        assert_eq!(
            after.dropdown(ControlId::SearchGenre).unwrap().options().len(),
            3
        );
    }

    #[test]
    fn select_medium_narrows_item_types() {
        let mut api = api();
        api.load_metadata();
        let mut page = api.page(PageKind::Search).page.unwrap();
        api.select_medium(&mut page, "anime");
        assert_eq!(
            page.dropdown(ControlId::SearchItemType)
                .unwrap()
                .options()
                .len(),
            3
        );
    }

    #[test]
    fn delete_refreshes_the_displayed_results() {
        let mut api = api();
        api.search(&SearchFilters::new());
        assert_eq!(api.results().cards().len(), 2);

        api.delete_entry(2, &mut AutoPrompter::yes());
        assert_eq!(api.results().cards().len(), 1);
    }

    #[test]
    fn submit_uses_the_schema_of_the_record_type() {
        let mut api = api();
        let form = FormData::new()
            .with("title_name", "Monster")
            .with("authors", "1");
        let result = api.submit("manga", form);
        let id = result.entry_id.unwrap();
        let entry = api.get_entry(id).unwrap().entry.unwrap();
        assert_eq!(entry.field_values("authors"), vec!["1"]);
        assert_eq!(entry.medium_type.as_deref(), Some("manga"));
    }

    #[test]
    fn update_entry_round_trips_the_edit_form() {
        let mut api = api();
        let entry = api.get_entry(2).unwrap().entry.unwrap();
        let form = api.edit_form(&entry);
        let result = api.update_entry(2, &entry, &form);
        assert_eq!(result.messages[0].content, "Update Successful");
    }
}
