use crate::commands::cascade::{apply_medium_filter, populate_item_types};
use crate::commands::CmdResult;
use crate::metadata::{Collection, MetadataStore};
use crate::model::MediumContext;
use crate::store::CatalogBackend;
use crate::view::{ControlId, PageKind, PageView};
use std::sync::Arc;
use tracing::{debug, warn};

/// Fetches the metadata bundle. On any failure the current store is kept
/// and the failure is only logged; nothing is retried.
pub fn load<B: CatalogBackend>(backend: &B, current: &Arc<MetadataStore>) -> Arc<MetadataStore> {
    match backend.fetch_metadata() {
        Ok(store) => {
            debug!(
                collections = store.collection_names().count(),
                "metadata loaded"
            );
            Arc::new(store)
        }
        Err(e) => {
            warn!(error = %e, "failed to load metadata");
            Arc::clone(current)
        }
    }
}

/// Fills every dropdown of `page` from `metadata`.
pub fn populate_page(page: &mut PageView, metadata: &MetadataStore) {
    match page.kind() {
        PageKind::Search => {
            apply_medium_filter(page, metadata, &MediumContext::All);
            populate_plain(
                page,
                metadata,
                &[
                    (ControlId::SearchSource, Collection::Source),
                    (ControlId::SearchRating, Collection::AgeRating),
                    (ControlId::SearchGenre, Collection::Genre),
                    (ControlId::SearchTheme, Collection::Theme),
                ],
            );
        }
        PageKind::InsertAnime => {
            populate_item_types(
                page,
                ControlId::InsertItemType,
                metadata,
                &MediumContext::parse("anime"),
            );
            populate_plain(
                page,
                metadata,
                &[
                    (ControlId::InsertStatus, Collection::StatusType),
                    (ControlId::InsertSource, Collection::Source),
                    (ControlId::InsertRating, Collection::AgeRating),
                    (ControlId::InsertGenre, Collection::Genre),
                    (ControlId::InsertTheme, Collection::Theme),
                    (ControlId::InsertDemographic, Collection::Demographic),
                    (ControlId::InsertStudio, Collection::Studio),
                    (ControlId::InsertProducer, Collection::Producer),
                    (ControlId::InsertLicensor, Collection::Licensor),
                ],
            );
        }
        PageKind::InsertManga => {
            populate_item_types(
                page,
                ControlId::InsertItemType,
                metadata,
                &MediumContext::parse("manga"),
            );
            populate_plain(
                page,
                metadata,
                &[
                    (ControlId::InsertStatus, Collection::StatusType),
                    (ControlId::InsertGenre, Collection::Genre),
                    (ControlId::InsertTheme, Collection::Theme),
                    (ControlId::InsertDemographic, Collection::Demographic),
                    (ControlId::InsertAuthor, Collection::Author),
                    (ControlId::InsertSerialization, Collection::Serialization),
                ],
            );
        }
    }
}

fn populate_plain(page: &mut PageView, metadata: &MetadataStore, pairs: &[(ControlId, Collection)]) {
    for &(control, collection) in pairs {
        page.populate(
            control,
            metadata.items(collection),
            collection.value_field(),
            collection.label_field(),
            None,
        );
    }
}

/// Builds and populates a page of `kind`.
pub fn page(kind: PageKind, metadata: &MetadataStore) -> CmdResult {
    let mut page = PageView::new(kind);
    populate_page(&mut page, metadata);
    CmdResult::default().with_page(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::{sample_metadata, BackendFixture};
    use crate::store::memory::{Endpoint, Failure, InMemoryBackend};

    #[test]
    fn load_replaces_the_store() {
        let fixture = BackendFixture::new();
        let empty = Arc::new(MetadataStore::new());
        let loaded = load(&fixture.backend, &empty);
        assert_eq!(loaded.items(Collection::Genre).len(), 2);
    }

    #[test]
    fn failed_load_keeps_previous_store() {
        let mut backend = InMemoryBackend::new();
        backend.fail(Endpoint::Metadata, Failure::Server(500, "boom".into()));
        let previous = Arc::new(sample_metadata());
        let kept = load(&backend, &previous);
        assert!(Arc::ptr_eq(&kept, &previous));
    }

    #[test]
    fn failed_first_load_leaves_sentinel_only_dropdowns() {
        let mut backend = InMemoryBackend::new();
        backend.fail(Endpoint::Metadata, Failure::Transport);
        let store = load(&backend, &Arc::new(MetadataStore::new()));

        let mut page = PageView::new(PageKind::Search);
        populate_page(&mut page, &store);
        for (_, dropdown) in page.dropdowns() {
            assert_eq!(dropdown.options().len(), 1);
            assert!(dropdown.options()[0].is_sentinel());
        }
    }

    #[test]
    fn search_page_fills_every_control() {
        let mut page = PageView::new(PageKind::Search);
        populate_page(&mut page, &sample_metadata());
        let count = |id| page.dropdown(id).unwrap().options().len();
        assert_eq!(count(ControlId::SearchItemType), 5);
        assert_eq!(count(ControlId::SearchStatus), 3);
        assert_eq!(count(ControlId::SearchSource), 2);
        assert_eq!(count(ControlId::SearchRating), 2);
        assert_eq!(count(ControlId::SearchGenre), 3);
        assert_eq!(count(ControlId::SearchTheme), 2);
    }

    #[test]
    fn insert_pages_restrict_item_types_to_their_medium() {
        let metadata = sample_metadata();
        let anime = page(PageKind::InsertAnime, &metadata).page.unwrap();
        let manga = page(PageKind::InsertManga, &metadata).page.unwrap();

        let labels = |page: &PageView| -> Vec<String> {
            page.dropdown(ControlId::InsertItemType)
                .unwrap()
                .options()
                .iter()
                .skip(1)
                .map(|o| o.label.clone())
                .collect()
        };
        assert_eq!(labels(&anime), vec!["Movie", "TV"]);
        assert_eq!(labels(&manga), vec!["Manga", "Novel"]);
        assert!(!manga.has_control(ControlId::InsertStudio));
        assert_eq!(
            manga
                .dropdown(ControlId::InsertAuthor)
                .unwrap()
                .options()[1]
                .label,
            "Miura, Kentarou"
        );
        assert!(anime.dropdown(ControlId::InsertGenre).unwrap().is_multiple());
    }
}
