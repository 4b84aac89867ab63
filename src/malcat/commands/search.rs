use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::CatalogRecord;
use crate::search::{SearchFilters, SearchSession, SearchTicket};
use crate::store::CatalogBackend;
use crate::view::ResultsView;
use tracing::{debug, warn};

/// Runs a search and, if it is still the newest one when it returns,
/// replaces the results display.
///
/// A failed search is logged and leaves the display as it was.
pub fn run<B: CatalogBackend>(
    backend: &B,
    session: &mut SearchSession,
    filters: &SearchFilters,
    default_limit: u32,
) -> CmdResult {
    let ticket = session.begin(filters);
    let query = filters.to_query_with_limit(default_limit);
    let outcome = backend.search(&query);
    finish(session, ticket, outcome)
}

/// Applies a search outcome for `ticket`. Split from [`run`] so a client that
/// issues searches concurrently can complete them in any order.
pub fn finish(
    session: &mut SearchSession,
    ticket: SearchTicket,
    outcome: Result<Vec<CatalogRecord>>,
) -> CmdResult {
    match outcome {
        Ok(records) => {
            debug!(count = records.len(), "search returned");
            session.complete(ticket, ResultsView::from_records(&records));
        }
        Err(e) => warn!(error = %e, "search failed"),
    }
    CmdResult::default().with_results(session.displayed().clone())
}

/// Re-runs the most recent search.
pub fn refresh<B: CatalogBackend>(
    backend: &B,
    session: &mut SearchSession,
    default_limit: u32,
) -> CmdResult {
    let filters = session.last_filters().clone();
    run(backend, session, &filters, default_limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::store::memory::fixtures::BackendFixture;
    use crate::store::memory::{Endpoint, Failure};

    #[test]
    fn empty_filters_send_only_the_limit() {
        let fixture = BackendFixture::new();
        let mut session = SearchSession::new();
        let filters = SearchFilters {
            medium: "all".into(),
            ..Default::default()
        };
        let result = run(&fixture.backend, &mut session, &filters, 50);

        assert_eq!(fixture.backend.requests(), vec!["GET /api/search?limit=50"]);
        assert_eq!(result.results.unwrap().cards().len(), 2);
    }

    #[test]
    fn configured_limit_applies_when_unset() {
        let fixture = BackendFixture::new();
        let mut session = SearchSession::new();
        run(&fixture.backend, &mut session, &SearchFilters::new(), 10);
        assert_eq!(fixture.backend.requests(), vec!["GET /api/search?limit=10"]);
    }

    #[test]
    fn no_match_shows_placeholder() {
        let fixture = BackendFixture::new();
        let mut session = SearchSession::new();
        let filters = SearchFilters {
            title: "nonexistent".into(),
            ..Default::default()
        };
        let result = run(&fixture.backend, &mut session, &filters, 50);
        assert_eq!(result.results, Some(ResultsView::NoResults));
        assert!(result.messages.is_empty());
    }

    #[test]
    fn failure_keeps_previous_results() {
        let mut fixture = BackendFixture::new();
        let mut session = SearchSession::new();
        run(&fixture.backend, &mut session, &SearchFilters::new(), 50);

        fixture.backend.fail(Endpoint::Search, Failure::Transport);
        let result = run(&fixture.backend, &mut session, &SearchFilters::new(), 50);
        assert_eq!(result.results.unwrap().cards().len(), 2);
        assert!(result.messages.is_empty());
    }

    #[test]
    fn stale_completion_does_not_replace_newer_results() {
        let mut session = SearchSession::new();
        let first = session.begin(&SearchFilters::new());
        let second = session.begin(&SearchFilters::new());

        let newer = vec![CatalogRecord {
            entry_id: 9,
            title_name: "Newer".into(),
            ..Default::default()
        }];
        finish(&mut session, second, Ok(newer));
        let result = finish(&mut session, first, Ok(vec![]));

        assert_eq!(result.results.unwrap().cards()[0].title, "Newer");
        assert!(result.messages.is_empty());
    }

    #[test]
    fn stale_failure_is_ignored() {
        let mut session = SearchSession::new();
        let first = session.begin(&SearchFilters::new());
        let second = session.begin(&SearchFilters::new());
        finish(&mut session, second, Ok(vec![]));
        let result = finish(
            &mut session,
            first,
            Err(CatalogError::Transport("late".into())),
        );
        assert_eq!(result.results, Some(ResultsView::NoResults));
    }
}
