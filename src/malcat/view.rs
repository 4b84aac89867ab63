//! # View Model
//!
//! Typed stand-ins for the controls a catalog page shows. The core never
//! touches a concrete UI: it mutates a [`PageView`] and produces a
//! [`ResultsView`], and each client decides how to draw them.
//!
//! Every dropdown starts with one sentinel option (empty value, label
//! [`SENTINEL_LABEL`]) and always keeps it as its first option.

use crate::model::{CatalogRecord, RecordType, ReferenceItem};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const SENTINEL_LABEL: &str = "Any/Select...";
pub const NO_RESULTS_MESSAGE: &str = "No results found.";

/// Identifiers of every selection control a page may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ControlId {
    SearchItemType,
    SearchStatus,
    SearchSource,
    SearchRating,
    SearchGenre,
    SearchTheme,
    InsertItemType,
    InsertStatus,
    InsertSource,
    InsertRating,
    InsertGenre,
    InsertTheme,
    InsertDemographic,
    InsertStudio,
    InsertProducer,
    InsertLicensor,
    InsertAuthor,
    InsertSerialization,
}

impl ControlId {
    /// Element id used by the page markup.
    pub fn element_id(self) -> &'static str {
        match self {
            ControlId::SearchItemType => "s_item_type",
            ControlId::SearchStatus => "s_status",
            ControlId::SearchSource => "s_source",
            ControlId::SearchRating => "s_rating",
            ControlId::SearchGenre => "s_genre",
            ControlId::SearchTheme => "s_theme",
            ControlId::InsertItemType => "in_item_type",
            ControlId::InsertStatus => "in_status",
            ControlId::InsertSource => "in_source",
            ControlId::InsertRating => "in_rating",
            ControlId::InsertGenre => "in_genre",
            ControlId::InsertTheme => "in_theme",
            ControlId::InsertDemographic => "in_demographic",
            ControlId::InsertStudio => "in_studio",
            ControlId::InsertProducer => "in_producer",
            ControlId::InsertLicensor => "in_licensor",
            ControlId::InsertAuthor => "in_author",
            ControlId::InsertSerialization => "in_serialization",
        }
    }

    /// Many-to-many relations are multi-selects on insert pages.
    pub fn is_multiple(self) -> bool {
        matches!(
            self,
            ControlId::InsertGenre
                | ControlId::InsertTheme
                | ControlId::InsertDemographic
                | ControlId::InsertStudio
                | ControlId::InsertProducer
                | ControlId::InsertLicensor
                | ControlId::InsertAuthor
                | ControlId::InsertSerialization
        )
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

/// The pages of the catalog, each with a fixed set of controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PageKind {
    Search,
    InsertAnime,
    InsertManga,
}

impl PageKind {
    /// Insert/edit page for a record type. Types without a dedicated form get
    /// none.
    pub fn for_record_type(record_type: &RecordType) -> Option<Self> {
        match record_type {
            RecordType::Anime => Some(PageKind::InsertAnime),
            RecordType::Manga => Some(PageKind::InsertManga),
            RecordType::Other(_) => None,
        }
    }

    pub fn controls(self) -> &'static [ControlId] {
        match self {
            PageKind::Search => &[
                ControlId::SearchItemType,
                ControlId::SearchStatus,
                ControlId::SearchSource,
                ControlId::SearchRating,
                ControlId::SearchGenre,
                ControlId::SearchTheme,
            ],
            PageKind::InsertAnime => &[
                ControlId::InsertItemType,
                ControlId::InsertStatus,
                ControlId::InsertSource,
                ControlId::InsertRating,
                ControlId::InsertGenre,
                ControlId::InsertTheme,
                ControlId::InsertDemographic,
                ControlId::InsertStudio,
                ControlId::InsertProducer,
                ControlId::InsertLicensor,
            ],
            PageKind::InsertManga => &[
                ControlId::InsertItemType,
                ControlId::InsertStatus,
                ControlId::InsertGenre,
                ControlId::InsertTheme,
                ControlId::InsertDemographic,
                ControlId::InsertAuthor,
                ControlId::InsertSerialization,
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownOption {
    pub value: String,
    pub label: String,
}

impl DropdownOption {
    pub fn sentinel() -> Self {
        Self {
            value: String::new(),
            label: SENTINEL_LABEL.to_string(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.value.is_empty() && self.label == SENTINEL_LABEL
    }
}

/// A selection control. An empty `selected` list means the sentinel is
/// selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dropdown {
    options: Vec<DropdownOption>,
    selected: Vec<String>,
    multiple: bool,
}

impl Dropdown {
    pub fn single() -> Self {
        Self {
            options: vec![DropdownOption::sentinel()],
            selected: Vec::new(),
            multiple: false,
        }
    }

    pub fn multiple() -> Self {
        Self {
            multiple: true,
            ..Self::single()
        }
    }

    pub fn options(&self) -> &[DropdownOption] {
        &self.options
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// The selected value as a string; the sentinel reads as `""`.
    pub fn value(&self) -> &str {
        self.selected.first().map(String::as_str).unwrap_or("")
    }

    pub fn selected_values(&self) -> &[String] {
        &self.selected
    }

    /// Selects `value` if some option carries it. Selecting `""` resets to the
    /// sentinel. Returns false, leaving the selection alone, for unknown values.
    pub fn select(&mut self, value: &str) -> bool {
        if value.is_empty() {
            self.selected.clear();
            return true;
        }
        if !self.has_item_value(value) {
            return false;
        }
        if self.multiple {
            if !self.selected.iter().any(|v| v == value) {
                self.selected.push(value.to_string());
            }
        } else {
            self.selected = vec![value.to_string()];
        }
        true
    }

    fn has_item_value(&self, value: &str) -> bool {
        self.options[1..].iter().any(|o| o.value == value)
    }

    /// Rebuilds the options from `items` and keeps whatever part of the
    /// previous selection is still offered.
    pub fn populate(
        &mut self,
        items: &[ReferenceItem],
        value_field: &str,
        label_field: &str,
        predicate: Option<&dyn Fn(&ReferenceItem) -> bool>,
    ) {
        let previous = std::mem::take(&mut self.selected);

        self.options.clear();
        self.options.push(DropdownOption::sentinel());
        self.options.extend(
            items
                .iter()
                .filter(|item| predicate.is_none_or(|keep| keep(*item)))
                .map(|item| DropdownOption {
                    value: item.field_string(value_field),
                    label: item.field_string(label_field),
                }),
        );

        for value in previous {
            if self.has_item_value(&value) {
                self.selected.push(value);
            }
        }
    }
}

/// All selection controls of one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    kind: PageKind,
    dropdowns: BTreeMap<ControlId, Dropdown>,
}

impl PageView {
    pub fn new(kind: PageKind) -> Self {
        let dropdowns = kind
            .controls()
            .iter()
            .map(|&id| {
                let dropdown = if id.is_multiple() {
                    Dropdown::multiple()
                } else {
                    Dropdown::single()
                };
                (id, dropdown)
            })
            .collect();
        Self { kind, dropdowns }
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn has_control(&self, id: ControlId) -> bool {
        self.dropdowns.contains_key(&id)
    }

    pub fn dropdown(&self, id: ControlId) -> Option<&Dropdown> {
        self.dropdowns.get(&id)
    }

    pub fn dropdowns(&self) -> impl Iterator<Item = (ControlId, &Dropdown)> {
        self.dropdowns.iter().map(|(id, d)| (*id, d))
    }

    /// Populates the control `id`. Pages without that control ignore the call,
    /// so the same population code can run on every page.
    pub fn populate(
        &mut self,
        id: ControlId,
        items: &[ReferenceItem],
        value_field: &str,
        label_field: &str,
        predicate: Option<&dyn Fn(&ReferenceItem) -> bool>,
    ) {
        if let Some(dropdown) = self.dropdowns.get_mut(&id) {
            dropdown.populate(items, value_field, label_field, predicate);
        }
    }

    /// Returns false if the control is absent or does not offer `value`.
    pub fn select(&mut self, id: ControlId, value: &str) -> bool {
        self.dropdowns
            .get_mut(&id)
            .is_some_and(|dropdown| dropdown.select(value))
    }

    pub fn value(&self, id: ControlId) -> Option<&str> {
        self.dropdowns.get(&id).map(Dropdown::value)
    }
}

/// An action a result card offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CardAction {
    /// Navigate to the edit view at this path.
    Edit(String),
    Delete(u64),
}

/// Display-ready content of one search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultCard {
    pub entry_id: u64,
    pub score: String,
    pub title: String,
    pub type_label: String,
    pub status: String,
    pub details: String,
    pub age_rating: String,
}

impl ResultCard {
    pub fn from_record(record: &CatalogRecord) -> Self {
        let mut details = Vec::new();
        if let Some(eps) = record.episodes.filter(|&n| n > 0) {
            details.push(format!("{} eps", eps));
        }
        if let Some(year) = record.premier_date_year.filter(|&y| y != 0) {
            details.push(format!("({})", year));
        }
        if let Some(season) = non_empty(&record.premier_date_season) {
            details.push(season.to_string());
        }
        if let Some(vols) = record.volumes.filter(|&n| n > 0) {
            details.push(format!("{} vols", vols));
        }

        Self {
            entry_id: record.entry_id,
            score: non_empty(&record.score).unwrap_or("N/A").to_string(),
            title: record.title_name.clone(),
            type_label: non_empty(&record.type_name)
                .or_else(|| non_empty(&record.medium_type))
                .unwrap_or_default()
                .to_string(),
            status: non_empty(&record.status_name).unwrap_or("-").to_string(),
            details: details.join(" "),
            age_rating: non_empty(&record.age_rating)
                .unwrap_or_default()
                .to_string(),
        }
    }

    pub fn edit_path(&self) -> String {
        format!("/update/{}", self.entry_id)
    }

    pub fn actions(&self) -> [CardAction; 2] {
        [
            CardAction::Edit(self.edit_path()),
            CardAction::Delete(self.entry_id),
        ]
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// What the results area shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum ResultsView {
    /// Nothing has been searched yet.
    #[default]
    Blank,
    /// A search came back empty; shows [`NO_RESULTS_MESSAGE`].
    NoResults,
    Cards(Vec<ResultCard>),
}

impl ResultsView {
    pub fn from_records(records: &[CatalogRecord]) -> Self {
        if records.is_empty() {
            ResultsView::NoResults
        } else {
            ResultsView::Cards(records.iter().map(ResultCard::from_record).collect())
        }
    }

    pub fn cards(&self) -> &[ResultCard] {
        match self {
            ResultsView::Cards(cards) => cards,
            _ => &[],
        }
    }
}
