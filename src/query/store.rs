//! The persisted query store: location over storage over defaults.

use super::storage::Storage;
use super::{QueryPatch, QueryState};

/// Scheme and path of the shareable dashboard link.
pub const LINK_PREFIX: &str = "dogwatch://monitors";

/// The dashboard's shareable link: a single slot holding the query string.
///
/// Writes replace the slot; there is no history of previous values.
#[derive(Debug, Clone, Default)]
pub struct LocationBar {
    query: String,
}

impl LocationBar {
    /// Create from either a bare query string (`state=Alert&ps=100`, with or
    /// without `?`) or a full link (`dogwatch://monitors?state=Alert`).
    pub fn new(initial: &str) -> Self {
        let initial = initial.trim();
        let query = match initial.split_once('?') {
            Some((_, query)) => query,
            None if initial.contains("://") => "",
            None => initial,
        };
        Self {
            query: query.to_string(),
        }
    }

    /// Current query string, without a leading `?`.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the current query string.
    pub fn replace(&mut self, query: &str) {
        self.query = query.to_string();
    }

    /// The full link for sharing.
    pub fn link(&self) -> String {
        if self.query.is_empty() {
            LINK_PREFIX.to_string()
        } else {
            format!("{}?{}", LINK_PREFIX, self.query)
        }
    }
}

/// Reads and writes the query through a location and a storage backend.
///
/// `read` resolves each field from the location first, then storage, then
/// the default. `update` writes the location with defaults omitted and
/// storage with every field.
#[derive(Debug)]
pub struct QueryStore {
    location: LocationBar,
    storage: Box<dyn Storage>,
}

impl QueryStore {
    pub fn new(location: LocationBar, storage: Box<dyn Storage>) -> Self {
        Self { location, storage }
    }

    /// Current query, reconstructed from location and storage.
    pub fn read(&self) -> QueryState {
        let params: Vec<(String, String)> =
            url::form_urlencoded::parse(self.location.query().as_bytes()).into_owned().collect();

        QueryState::from_layers(
            |field| {
                params.iter().find(|(key, _)| key == field.url_key()).map(|(_, v)| v.clone())
            },
            |field| self.storage.get(field.storage_key()),
        )
    }

    /// Merge a change and write the result back to location and storage.
    pub fn update(&mut self, patch: &QueryPatch) -> QueryState {
        let next = self.read().merged(patch);
        self.persist(&next);
        next
    }

    /// Write `state` to both backends. Storage failures are logged only.
    pub fn persist(&mut self, state: &QueryState) {
        self.location.replace(&state.to_query_string());
        if let Err(e) = self.storage.set_many(&state.to_storage_entries()) {
            tracing::warn!("failed to persist query: {:#}", e);
        }
    }

    pub fn link(&self) -> String {
        self.location.link()
    }

    pub fn location(&self) -> &LocationBar {
        &self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MonitorState;
    use crate::query::{FileStorage, MemoryStorage, StateFilter};
    use tempfile::TempDir;

    fn store(query: &str) -> QueryStore {
        QueryStore::new(LocationBar::new(query), Box::new(MemoryStorage::new()))
    }

    #[test]
    fn test_location_accepts_links_and_bare_queries() {
        assert_eq!(LocationBar::new("state=Alert").query(), "state=Alert");
        assert_eq!(LocationBar::new("?state=Alert").query(), "state=Alert");
        assert_eq!(
            LocationBar::new("dogwatch://monitors?state=Alert&ps=100").query(),
            "state=Alert&ps=100"
        );
        assert_eq!(LocationBar::new("dogwatch://monitors").query(), "");
    }

    #[test]
    fn test_link() {
        assert_eq!(LocationBar::new("").link(), "dogwatch://monitors");
        assert_eq!(LocationBar::new("p=2").link(), "dogwatch://monitors?p=2");
    }

    #[test]
    fn test_read_defaults() {
        assert_eq!(store("").read(), QueryState::default());
    }

    #[test]
    fn test_read_then_persist_round_trips_location() {
        let mut store = store("?state=Alert&ps=100");
        let state = store.read();
        store.persist(&state);
        assert_eq!(store.location().query(), "state=Alert&ps=100");
    }

    #[test]
    fn test_update_writes_location_without_defaults() {
        let mut store = store("");
        let state = store.update(&QueryPatch::state(StateFilter::Only(MonitorState::Warn)));
        assert_eq!(state.state, StateFilter::Only(MonitorState::Warn));
        assert_eq!(store.location().query(), "state=Warn");

        store.update(&QueryPatch::state(StateFilter::All));
        assert_eq!(store.location().query(), "");
    }

    #[test]
    fn test_update_replaces_rather_than_appends() {
        let mut store = store("q=first");
        store.update(&QueryPatch::search("second"));
        store.update(&QueryPatch::search("third"));
        assert_eq!(store.location().query(), "q=third");
    }

    #[test]
    fn test_storage_restores_fresh_location() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("query.json");

        {
            let mut first = QueryStore::new(LocationBar::new(""), Box::new(FileStorage::open(&path)));
            first.update(&QueryPatch::hide_ok(true));
            first.update(&QueryPatch::search("checkout"));
        }

        // A new session with a bare link picks up the stored values
        let second = QueryStore::new(LocationBar::new(""), Box::new(FileStorage::open(&path)));
        let state = second.read();
        assert!(state.hide_ok);
        assert_eq!(state.search, "checkout");
    }

    #[test]
    fn test_location_overrides_storage() {
        let mut storage = MemoryStorage::new();
        storage
            .set_many(&[("dogwatch.state", "Alert".to_string()), ("dogwatch.q", "x".to_string())])
            .unwrap();
        let store = QueryStore::new(LocationBar::new("state=OK"), Box::new(storage));
        assert_eq!(store.read().state, StateFilter::Only(MonitorState::Ok));
    }

    #[test]
    fn test_update_writes_every_field_to_storage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("query.json");
        let mut store = QueryStore::new(LocationBar::new(""), Box::new(FileStorage::open(&path)));
        store.update(&QueryPatch::page(2));

        let storage = FileStorage::open(&path);
        for field in crate::query::Field::ALL {
            assert!(storage.get(field.storage_key()).is_some(), "{:?}", field);
        }
        assert_eq!(storage.get("dogwatch.page").as_deref(), Some("2"));
        assert_eq!(storage.get("dogwatch.state").as_deref(), Some("ALL"));
    }
}
