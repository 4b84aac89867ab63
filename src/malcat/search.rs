//! # Search Requests
//!
//! [`SearchFilters`] mirrors the search form. [`SearchFilters::to_query`]
//! turns it into query parameters, dropping every filter that is empty or
//! set to `"all"`.
//!
//! Overlapping searches are sequenced by [`SearchSession`]: each request takes
//! a [`SearchTicket`] and only the newest ticket may replace what is displayed.

use crate::model::ALL_MEDIA;
use crate::view::ResultsView;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_LIMIT: u32 = 50;

/// Current values of the search controls. Every field is the raw control
/// string; an empty string means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    pub title: String,
    pub medium: String,
    pub score_min: String,
    pub item_type_id: String,
    pub status_id: String,
    pub source_id: String,
    pub age_rating_id: String,
    pub genre_id: String,
    pub theme_id: String,
    pub season: String,
    pub year: String,
    pub limit: String,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> [(&'static str, &str); 11] {
        [
            ("title", self.title.as_str()),
            ("medium", self.medium.as_str()),
            ("score_min", self.score_min.as_str()),
            ("item_type_id", self.item_type_id.as_str()),
            ("status_id", self.status_id.as_str()),
            ("source_id", self.source_id.as_str()),
            ("age_rating_id", self.age_rating_id.as_str()),
            ("genre_id", self.genre_id.as_str()),
            ("theme_id", self.theme_id.as_str()),
            ("season", self.season.as_str()),
            ("year", self.year.as_str()),
        ]
    }

    /// Query parameters for `/api/search`, in form order. An empty `limit`
    /// falls back to `default_limit`; a `limit` of "all" is omitted like any
    /// other filter.
    pub fn to_query_with_limit(&self, default_limit: u32) -> Vec<(&'static str, String)> {
        let mut query: Vec<(&'static str, String)> = self
            .entries()
            .into_iter()
            .filter(|(_, value)| is_set(value))
            .map(|(key, value)| (key, value.to_string()))
            .collect();

        match self.limit.as_str() {
            "" => query.push(("limit", default_limit.to_string())),
            ALL_MEDIA => {}
            limit => query.push(("limit", limit.to_string())),
        }
        query
    }

    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        self.to_query_with_limit(DEFAULT_LIMIT)
    }
}

fn is_set(value: &str) -> bool {
    !value.is_empty() && value != ALL_MEDIA
}

/// Encodes query pairs as a `key=value&...` string.
pub fn encode_query(pairs: &[(&str, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())))
        .finish()
}

/// Handle for one in-flight search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

/// Owns the results display and decides which completion may update it.
#[derive(Debug, Default)]
pub struct SearchSession {
    issued: u64,
    displayed: ResultsView,
    last_filters: SearchFilters,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new search. Any ticket issued earlier becomes stale.
    pub fn begin(&mut self, filters: &SearchFilters) -> SearchTicket {
        self.issued += 1;
        self.last_filters = filters.clone();
        SearchTicket(self.issued)
    }

    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Replaces the display with `view` if `ticket` is the newest search.
    /// Returns whether the display changed hands.
    pub fn complete(&mut self, ticket: SearchTicket, view: ResultsView) -> bool {
        if !self.is_current(ticket) {
            debug!(
                ticket = ticket.0,
                latest = self.issued,
                "dropping stale search response"
            );
            return false;
        }
        self.displayed = view;
        true
    }

    pub fn displayed(&self) -> &ResultsView {
        &self.displayed
    }

    /// Filters of the most recent search, used to refresh after a change.
    pub fn last_filters(&self) -> &SearchFilters {
        &self.last_filters
    }

    /// Sets the filters a refresh will use without issuing a search.
    pub fn set_last_filters(&mut self, filters: SearchFilters) {
        self.last_filters = filters;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CatalogRecord;

    #[test]
    fn unset_filters_produce_only_the_default_limit() {
        let filters = SearchFilters {
            title: String::new(),
            medium: "all".into(),
            limit: String::new(),
            ..Default::default()
        };
        assert_eq!(encode_query(&filters.to_query()), "limit=50");
    }

    #[test]
    fn all_and_empty_values_are_omitted() {
        let filters = SearchFilters {
            medium: "all".into(),
            genre_id: "all".into(),
            status_id: String::new(),
            ..Default::default()
        };
        let keys: Vec<_> = filters.to_query().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["limit"]);
    }

    #[test]
    fn set_filters_keep_form_order() {
        let filters = SearchFilters {
            year: "2004".into(),
            title: "monster".into(),
            medium: "anime".into(),
            genre_id: "7".into(),
            limit: "10".into(),
            ..Default::default()
        };
        assert_eq!(
            encode_query(&filters.to_query()),
            "title=monster&medium=anime&genre_id=7&year=2004&limit=10"
        );
    }

    #[test]
    fn empty_limit_uses_configured_default() {
        let filters = SearchFilters::default();
        assert_eq!(filters.to_query_with_limit(25), vec![("limit", "25".to_string())]);
    }

    #[test]
    fn limit_all_is_omitted() {
        let filters = SearchFilters {
            medium: "manga".into(),
            limit: "all".into(),
            ..Default::default()
        };
        assert_eq!(encode_query(&filters.to_query_with_limit(25)), "medium=manga");
    }

    #[test]
    fn title_is_url_encoded() {
        let filters = SearchFilters {
            title: "fullmetal & co".into(),
            ..Default::default()
        };
        assert_eq!(
            encode_query(&filters.to_query()),
            "title=fullmetal+%26+co&limit=50"
        );
    }

    #[test]
    fn stale_completion_does_not_replace_newer_results() {
        let mut session = SearchSession::new();
        let slow = session.begin(&SearchFilters::default());
        let fast = session.begin(&SearchFilters::default());

        let newer = ResultsView::from_records(&[CatalogRecord {
            entry_id: 2,
            title_name: "Newer".into(),
            ..Default::default()
        }]);
        assert!(session.complete(fast, newer.clone()));
        assert!(!session.complete(slow, ResultsView::NoResults));
        assert_eq!(session.displayed(), &newer);
    }
}
