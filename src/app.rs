//! Application state and navigation logic.

use std::path::Path;
use std::time::{Duration, Instant, SystemTime};

use anyhow::Result;

use crate::data::{exclude_tagged, Dashboard, FirstSeen, Monitor};
use crate::fetch::{Debouncer, FetchState, Fetcher};
use crate::query::{QueryPatch, QueryState, QueryStore, StateFilter, DEFAULT_PAGE_SIZE, PAGE_SIZES};
use crate::source::MonitorQuery;
use crate::ui::Theme;

/// How long a status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// The current view/tab in the TUI.
///
/// Monitor detail is shown as an overlay (controlled by `App::show_detail_overlay`)
/// rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Monitors grouped by service, paginated.
    Services,
    /// Alert / Warn / OK columns.
    Board,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Services => View::Board,
            View::Board => View::Services,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        // Two views: previous and next coincide
        self.next()
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Services => "Services",
            View::Board => "Board",
        }
    }
}

/// Which text input, if any, is capturing keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Tags,
}

/// Behaviour knobs resolved from configuration.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub prod_tag: String,
    pub exclude_tags: Vec<String>,
    pub refresh_interval: Duration,
    pub debounce: Duration,
    pub auto_refresh: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            prod_tag: "env:prod".to_string(),
            exclude_tags: Vec::new(),
            refresh_interval: Duration::from_secs(30),
            debounce: Duration::from_millis(300),
            auto_refresh: true,
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Query and fetching
    store: QueryStore,
    pub query: QueryState,
    fetcher: Fetcher,
    options: AppOptions,

    // Raw text inputs; the query only sees their debounced values
    pub input_mode: InputMode,
    pub search_input: String,
    pub tags_input: String,
    search_debounce: Debouncer<String>,
    tags_debounce: Debouncer<String>,

    // Auto-refresh
    pub auto_refresh: bool,
    next_refresh: Option<Instant>,

    // Derived
    pub dashboard: Dashboard,
    pub first_seen: FirstSeen,

    // Navigation state
    pub selected_index: usize,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create the app, restore the query and start the first fetch.
    pub fn new(store: QueryStore, fetcher: Fetcher, options: AppOptions, now: Instant) -> Self {
        let query = store.read();
        let auto_refresh = options.auto_refresh;

        let mut app = Self {
            running: true,
            current_view: View::Services,
            show_help: false,
            show_detail_overlay: false,
            input_mode: InputMode::Normal,
            search_input: query.search.clone(),
            tags_input: query.tags.clone(),
            search_debounce: Debouncer::new(query.search.clone(), options.debounce),
            tags_debounce: Debouncer::new(query.tags.clone(), options.debounce),
            auto_refresh,
            next_refresh: auto_refresh.then(|| now + options.refresh_interval),
            dashboard: Dashboard::default(),
            first_seen: FirstSeen::new(),
            selected_index: 0,
            theme: Theme::dark(),
            status_message: None,
            store,
            query,
            fetcher,
            options,
        };

        // Normalize the location (drops invalid or default-valued params)
        app.store.persist(&app.query);
        app.rebuild();
        app.fetch("startup");
        app
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.fetcher.description()
    }

    pub fn fetch_state(&self) -> &FetchState {
        self.fetcher.state()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// The shareable link for the current query.
    pub fn share_link(&self) -> String {
        self.store.link()
    }

    /// Server-side parameters for the current query.
    pub fn monitor_query(&self) -> MonitorQuery {
        MonitorQuery::new(
            &self.query.search,
            &self.query.tags,
            self.query.only_prod,
            &self.options.prod_tag,
        )
    }

    fn fetch(&mut self, reason: &str) {
        let query = self.monitor_query();
        self.fetcher.request(query, reason);
    }

    /// Apply a query change, persist it and rebuild the derived view.
    fn update_query(&mut self, patch: QueryPatch) {
        self.query = self.store.update(&patch);
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.dashboard = Dashboard::build(
            &self.fetcher.state().monitors,
            &self.query,
            &self.options.exclude_tags,
        );
        self.clamp_selection();
    }

    /// Advance timers and collect fetch results. Called once per loop iteration.
    pub fn tick(&mut self, now: Instant) {
        let mut refetch = false;

        if let Some(search) = self.search_debounce.poll(now) {
            self.update_query(QueryPatch::search(search));
            refetch = true;
        }
        if let Some(tags) = self.tags_debounce.poll(now) {
            self.update_query(QueryPatch::tags(tags));
            refetch = true;
        }
        if refetch {
            self.fetch("filters changed");
        }

        if let Some(due) = self.next_refresh {
            if self.auto_refresh && now >= due {
                self.fetch("auto-refresh");
                self.next_refresh = Some(now + self.options.refresh_interval);
            }
        }

        if self.fetcher.poll() {
            let state = self.fetcher.state();
            if state.error.is_none() {
                // Excluded monitors are never shown, so they get no timestamp
                let shown = exclude_tagged(&state.monitors, &self.options.exclude_tags);
                self.first_seen.record(&shown, SystemTime::now());
            }
            self.rebuild();
        }
    }

    /// Fetch now with the current query.
    pub fn refresh(&mut self) {
        self.fetch("manual refresh");
    }

    /// Toggle periodic refresh. Enabling schedules the next one a full
    /// interval from now.
    pub fn toggle_auto_refresh(&mut self, now: Instant) {
        self.auto_refresh = !self.auto_refresh;
        self.next_refresh = self.auto_refresh.then(|| now + self.options.refresh_interval);
        let label = if self.auto_refresh { "on" } else { "off" };
        self.set_status_message(format!("Auto-refresh {}", label));
    }

    /// Seconds until the next automatic refresh, if scheduled.
    pub fn next_refresh_in(&self, now: Instant) -> Option<Duration> {
        self.next_refresh.map(|due| due.saturating_duration_since(now))
    }

    // --- Filters ---

    /// Cycle the state chip (ALL → Alert → Warn → NoData → Unknown → OK).
    pub fn cycle_state_filter(&mut self, forward: bool) {
        let next = if forward {
            self.query.state.next()
        } else {
            self.query.state.prev()
        };
        self.update_query(QueryPatch::state(next));
    }

    pub fn set_state_filter(&mut self, state: StateFilter) {
        self.update_query(QueryPatch::state(state));
    }

    pub fn toggle_hide_ok(&mut self) {
        self.update_query(QueryPatch::hide_ok(!self.query.hide_ok));
    }

    /// Production-only changes the server-side query, so it fetches at once.
    pub fn toggle_only_prod(&mut self) {
        self.update_query(QueryPatch::only_prod(!self.query.only_prod));
        self.fetch("only-prod toggled");
    }

    /// Step through the offered page sizes.
    pub fn cycle_page_size(&mut self, forward: bool) {
        let current = self.query.page_size;
        let next = if forward {
            PAGE_SIZES.iter().copied().find(|&size| size > current)
        } else {
            PAGE_SIZES.iter().rev().copied().find(|&size| size < current)
        };
        match next {
            Some(size) => self.update_query(QueryPatch::page_size(size)),
            None => self.set_status_message(format!("Page size {}", current)),
        }
    }

    /// Show one more page of groups.
    pub fn load_more(&mut self) {
        if self.dashboard.page.has_more {
            self.update_query(QueryPatch::page(self.query.page + 1));
        } else {
            self.set_status_message("All monitors shown".to_string());
        }
    }

    /// Reset every filter and the pagination.
    pub fn clear_filters(&mut self) {
        self.search_input.clear();
        self.tags_input.clear();
        self.search_debounce.reset(String::new());
        self.tags_debounce.reset(String::new());
        self.input_mode = InputMode::Normal;

        let refetch = !self.query.search.is_empty()
            || !self.query.tags.is_empty()
            || self.query.only_prod;

        self.update_query(QueryPatch {
            search: Some(String::new()),
            tags: Some(String::new()),
            state: Some(StateFilter::All),
            only_prod: Some(false),
            hide_ok: Some(false),
            page_size: Some(DEFAULT_PAGE_SIZE),
            page: Some(1),
        });

        if refetch {
            self.fetch("filters cleared");
        }
        self.set_status_message("Filters cleared".to_string());
    }

    // --- Text input ---

    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
    }

    pub fn start_tags(&mut self) {
        self.input_mode = InputMode::Tags;
    }

    /// Leave input mode; the typed text keeps settling in the background.
    pub fn finish_input(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_push(&mut self, c: char, now: Instant) {
        if let Some(text) = self.active_input() {
            text.push(c);
        }
        self.input_changed(now);
    }

    pub fn input_pop(&mut self, now: Instant) {
        if let Some(text) = self.active_input() {
            text.pop();
        }
        self.input_changed(now);
    }

    /// Empty the active input.
    pub fn input_clear(&mut self, now: Instant) {
        if let Some(text) = self.active_input() {
            text.clear();
        }
        self.input_changed(now);
    }

    fn active_input(&mut self) -> Option<&mut String> {
        match self.input_mode {
            InputMode::Normal => None,
            InputMode::Search => Some(&mut self.search_input),
            InputMode::Tags => Some(&mut self.tags_input),
        }
    }

    fn input_changed(&mut self, now: Instant) {
        match self.input_mode {
            InputMode::Normal => {}
            InputMode::Search => self.search_debounce.push(self.search_input.clone(), now),
            InputMode::Tags => self.tags_debounce.push(self.tags_input.clone(), now),
        }
    }

    // --- Views and selection ---

    pub fn next_view(&mut self) {
        self.set_view(self.current_view.next());
    }

    pub fn prev_view(&mut self) {
        self.set_view(self.current_view.prev());
    }

    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
        self.selected_index = 0;
    }

    /// Number of selectable rows in the current view.
    pub fn row_count(&self) -> usize {
        match self.current_view {
            View::Services => self.dashboard.page.visible,
            View::Board => self.dashboard.board.len(),
        }
    }

    fn clamp_selection(&mut self) {
        let max = self.row_count().saturating_sub(1);
        self.selected_index = self.selected_index.min(max);
        if self.show_detail_overlay && self.row_count() == 0 {
            self.show_detail_overlay = false;
        }
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.row_count().saturating_sub(1);
        self.selected_index = (self.selected_index + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_index = self.selected_index.saturating_sub(n);
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        self.selected_index = self.row_count().saturating_sub(1);
    }

    /// The monitor under the cursor in the current view.
    pub fn selected_monitor(&self) -> Option<&Monitor> {
        match self.current_view {
            View::Services => self.dashboard.visible_monitor(self.selected_index),
            View::Board => self.dashboard.board.monitors().nth(self.selected_index),
        }
    }

    /// Open the detail overlay for the currently selected monitor.
    pub fn enter_detail(&mut self) {
        if self.selected_monitor().is_some() {
            self.show_detail_overlay = true;
        }
    }

    /// Navigate back: close overlays first, then return to the Services view.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
        } else if self.current_view != View::Services {
            self.set_view(View::Services);
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Show the shareable link in the status bar.
    pub fn show_share_link(&mut self) {
        let link = self.share_link();
        self.set_status_message(link);
    }

    /// Signal the application to quit, cancelling any outstanding fetch.
    pub fn quit(&mut self) {
        self.fetcher.shutdown();
        self.running = false;
    }

    /// Export the current query, stats and groups to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        crate::export::write_file(path, &self.query, &self.dashboard)
    }
}
