//! Dashboard query state and its flat key/value encoding.
//!
//! The query (search text, tag filter, state chip, toggles and pagination)
//! lives in two places: a shareable location string, where only non-default
//! values appear, and local storage, where every field is always written.
//! [`Field`] is the single table that maps each field to both encodings.

mod storage;
mod store;

pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{LocationBar, QueryStore, LINK_PREFIX};

use std::fmt;

use serde::Serialize;

use crate::data::MonitorState;

/// Page size used when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Page sizes offered by the page size control.
pub const PAGE_SIZES: [usize; 4] = [25, 50, 100, 200];

/// The state chip: all monitors, or only one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateFilter {
    #[default]
    All,
    Only(MonitorState),
}

impl StateFilter {
    /// Chip order used when cycling.
    const CYCLE: [StateFilter; 6] = [
        StateFilter::All,
        StateFilter::Only(MonitorState::Alert),
        StateFilter::Only(MonitorState::Warn),
        StateFilter::Only(MonitorState::NoData),
        StateFilter::Only(MonitorState::Unknown),
        StateFilter::Only(MonitorState::Ok),
    ];

    pub fn matches(self, state: MonitorState) -> bool {
        match self {
            StateFilter::All => true,
            StateFilter::Only(wanted) => wanted == state,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StateFilter::All => "ALL",
            StateFilter::Only(state) => state.label(),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        if s == "ALL" {
            return Some(StateFilter::All);
        }
        MonitorState::parse(s).map(StateFilter::Only)
    }

    pub fn next(self) -> Self {
        let i = Self::CYCLE.iter().position(|f| *f == self).unwrap_or(0);
        Self::CYCLE[(i + 1) % Self::CYCLE.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::CYCLE.iter().position(|f| *f == self).unwrap_or(0);
        Self::CYCLE[(i + Self::CYCLE.len() - 1) % Self::CYCLE.len()]
    }
}

impl fmt::Display for StateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for StateFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Filter and pagination parameters of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryState {
    pub search: String,
    /// Comma-joined tag filter sent to the API.
    pub tags: String,
    pub state: StateFilter,
    pub only_prod: bool,
    pub hide_ok: bool,
    pub page_size: usize,
    pub page: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search: String::new(),
            tags: String::new(),
            state: StateFilter::All,
            only_prod: false,
            hide_ok: false,
            page_size: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }
}

/// A partial change to the query. Unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPatch {
    pub search: Option<String>,
    pub tags: Option<String>,
    pub state: Option<StateFilter>,
    pub only_prod: Option<bool>,
    pub hide_ok: Option<bool>,
    pub page_size: Option<usize>,
    pub page: Option<usize>,
}

impl QueryPatch {
    pub fn search(value: impl Into<String>) -> Self {
        Self {
            search: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn tags(value: impl Into<String>) -> Self {
        Self {
            tags: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn state(value: StateFilter) -> Self {
        Self {
            state: Some(value),
            ..Self::default()
        }
    }

    pub fn only_prod(value: bool) -> Self {
        Self {
            only_prod: Some(value),
            ..Self::default()
        }
    }

    pub fn hide_ok(value: bool) -> Self {
        Self {
            hide_ok: Some(value),
            ..Self::default()
        }
    }

    pub fn page_size(value: usize) -> Self {
        Self {
            page_size: Some(value),
            ..Self::default()
        }
    }

    pub fn page(value: usize) -> Self {
        Self {
            page: Some(value),
            ..Self::default()
        }
    }

    /// Whether applying this patch sends the view back to page 1.
    fn resets_page(&self) -> bool {
        self.search.is_some()
            || self.tags.is_some()
            || self.state.is_some()
            || self.only_prod.is_some()
            || self.hide_ok.is_some()
            || self.page_size.is_some()
    }
}

impl QueryState {
    /// Apply a patch. Any filter or page size change resets the page to 1
    /// unless the patch sets the page itself.
    pub fn merged(&self, patch: &QueryPatch) -> QueryState {
        let mut next = self.clone();

        if let Some(search) = &patch.search {
            next.search = search.clone();
        }
        if let Some(tags) = &patch.tags {
            next.tags = tags.clone();
        }
        if let Some(state) = patch.state {
            next.state = state;
        }
        if let Some(only_prod) = patch.only_prod {
            next.only_prod = only_prod;
        }
        if let Some(hide_ok) = patch.hide_ok {
            next.hide_ok = hide_ok;
        }
        if let Some(page_size) = patch.page_size {
            next.page_size = page_size.max(1);
        }

        match patch.page {
            Some(page) => next.page = page.max(1),
            None if patch.resets_page() => next.page = 1,
            None => {}
        }

        next
    }

    /// Query string with default-valued fields omitted, in [`Field::ALL`] order.
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for field in Field::ALL {
            if !field.is_default(self) {
                serializer.append_pair(field.url_key(), &field.url_value(self));
            }
        }
        serializer.finish()
    }

    /// Every field, keyed by its storage key.
    pub fn to_storage_entries(&self) -> Vec<(&'static str, String)> {
        Field::ALL
            .iter()
            .map(|field| (field.storage_key(), field.storage_value(self)))
            .collect()
    }

    /// Build a state from layered lookups: each field takes the first value
    /// that parses, trying `primary` then `fallback`, else the default.
    pub fn from_layers<P, F>(primary: P, fallback: F) -> QueryState
    where
        P: Fn(Field) -> Option<String>,
        F: Fn(Field) -> Option<String>,
    {
        let mut state = QueryState::default();
        for field in Field::ALL {
            let applied = primary(field).is_some_and(|raw| field.apply(&mut state, &raw))
                || fallback(field).is_some_and(|raw| field.apply(&mut state, &raw));
            if !applied {
                tracing::trace!(field = field.url_key(), "using default");
            }
        }
        state
    }
}

/// One persisted query field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Search,
    Tags,
    State,
    OnlyProd,
    HideOk,
    PageSize,
    Page,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Search,
        Field::Tags,
        Field::State,
        Field::OnlyProd,
        Field::HideOk,
        Field::PageSize,
        Field::Page,
    ];

    /// Key in the location query string.
    pub fn url_key(self) -> &'static str {
        match self {
            Field::Search => "q",
            Field::Tags => "tags",
            Field::State => "state",
            Field::OnlyProd => "prod",
            Field::HideOk => "hideok",
            Field::PageSize => "ps",
            Field::Page => "p",
        }
    }

    /// Key in local storage.
    pub fn storage_key(self) -> &'static str {
        match self {
            Field::Search => "dogwatch.search",
            Field::Tags => "dogwatch.tags",
            Field::State => "dogwatch.state",
            Field::OnlyProd => "dogwatch.prod",
            Field::HideOk => "dogwatch.hideok",
            Field::PageSize => "dogwatch.pageSize",
            Field::Page => "dogwatch.page",
        }
    }

    /// Whether the field holds its default value (and is left out of the location).
    pub fn is_default(self, state: &QueryState) -> bool {
        let default = QueryState::default();
        match self {
            Field::Search => state.search == default.search,
            Field::Tags => state.tags == default.tags,
            Field::State => state.state == default.state,
            Field::OnlyProd => state.only_prod == default.only_prod,
            Field::HideOk => state.hide_ok == default.hide_ok,
            Field::PageSize => state.page_size == default.page_size,
            Field::Page => state.page == default.page,
        }
    }

    fn url_value(self, state: &QueryState) -> String {
        match self {
            Field::OnlyProd | Field::HideOk => "1".to_string(),
            _ => self.storage_value(state),
        }
    }

    fn storage_value(self, state: &QueryState) -> String {
        match self {
            Field::Search => state.search.clone(),
            Field::Tags => state.tags.clone(),
            Field::State => state.state.label().to_string(),
            Field::OnlyProd => state.only_prod.to_string(),
            Field::HideOk => state.hide_ok.to_string(),
            Field::PageSize => state.page_size.to_string(),
            Field::Page => state.page.to_string(),
        }
    }

    /// Parse `raw` into the field. Returns false (leaving `state` untouched)
    /// when the value is invalid.
    fn apply(self, state: &mut QueryState, raw: &str) -> bool {
        match self {
            Field::Search => state.search = raw.to_string(),
            Field::Tags => state.tags = raw.to_string(),
            Field::State => match StateFilter::parse(raw) {
                Some(filter) => state.state = filter,
                None => return false,
            },
            Field::OnlyProd => match parse_flag(raw) {
                Some(flag) => state.only_prod = flag,
                None => return false,
            },
            Field::HideOk => match parse_flag(raw) {
                Some(flag) => state.hide_ok = flag,
                None => return false,
            },
            Field::PageSize => match parse_positive(raw) {
                Some(n) => state.page_size = n,
                None => return false,
            },
            Field::Page => match parse_positive(raw) {
                Some(n) => state.page = n,
                None => return false,
            },
        }
        true
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

fn parse_positive(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|n| *n > 0)
}
