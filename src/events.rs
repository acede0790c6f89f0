use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, InputMode, View};

/// File written by the in-app export key.
pub const EXPORT_FILE: &str = "dogwatch_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent, now: Instant) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If detail overlay is shown, handle overlay-specific keys
    if app.show_detail_overlay {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_overlay();
            }
            // Allow scrolling through monitors while overlay is open
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::PageUp => app.select_prev_n(10),
            KeyCode::PageDown => app.select_next_n(10),
            KeyCode::Home => app.select_first(),
            KeyCode::End => app.select_last(),
            _ => {}
        }
        return;
    }

    // If a text input is active, handle text input
    if app.input_mode != InputMode::Normal {
        handle_text_input(app, key, now);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Char('1') => app.set_view(View::Services),
        KeyCode::Char('2') => app.set_view(View::Board),

        // Navigation (up/down for items, left/right for tabs)
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Enter detail overlay
        KeyCode::Enter => app.enter_detail(),

        // Go back (Esc and Backspace)
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        // Text filters
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('t') => app.start_tags(),

        // Client-side filters
        KeyCode::Char('f') => app.cycle_state_filter(true),
        KeyCode::Char('F') => app.cycle_state_filter(false),
        KeyCode::Char('o') => app.toggle_hide_ok(),
        KeyCode::Char('p') => app.toggle_only_prod(),
        KeyCode::Char('c') => app.clear_filters(),

        // Pagination
        KeyCode::Char('m') => app.load_more(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.cycle_page_size(true),
        KeyCode::Char('-') => app.cycle_page_size(false),

        // Fetching
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('a') => app.toggle_auto_refresh(now),

        // Share link
        KeyCode::Char('y') => app.show_share_link(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Export
        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_FILE);
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle key input while the search or tags input is active
fn handle_text_input(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        // Leave the input; the text keeps settling
        KeyCode::Enter | KeyCode::Esc => app.finish_input(),

        // Clear the input
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input_clear(now);
        }

        KeyCode::Backspace => app.input_pop(now),

        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input_push(c, now);
        }

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        // Scroll wheel
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        // Tab clicks (row 1, after header)
        MouseEventKind::Down(MouseButton::Left) if mouse.row == 1 => {
            // Approximate tab positions: Services (0-13), Board (14-24)
            if mouse.column < 14 {
                app.set_view(View::Services);
            } else if mouse.column < 25 {
                app.set_view(View::Board);
            }
        }

        // Right-click goes back
        MouseEventKind::Down(MouseButton::Right) => app.go_back(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppOptions;
    use crate::fetch::tests::ScriptedSource;
    use crate::fetch::Fetcher;
    use crate::query::{LocationBar, MemoryStorage, QueryStore, StateFilter};
    use std::sync::Arc;
    use tokio::runtime::Handle;

    fn app() -> App {
        let fetcher = Fetcher::new(Arc::new(ScriptedSource::default()), Handle::current());
        let store = QueryStore::new(LocationBar::new(""), Box::new(MemoryStorage::new()));
        App::new(store, fetcher, AppOptions::default(), Instant::now())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_typing_goes_to_active_input() {
        let mut app = app();
        let now = Instant::now();

        handle_key_event(&mut app, key(KeyCode::Char('/')), now);
        assert_eq!(app.input_mode, InputMode::Search);

        // Shortcut keys are text while typing
        for c in "qo".chars() {
            handle_key_event(&mut app, key(KeyCode::Char(c)), now);
        }
        assert_eq!(app.search_input, "qo");
        assert!(app.running);
        assert!(!app.query.hide_ok);

        handle_key_event(&mut app, key(KeyCode::Backspace), now);
        assert_eq!(app.search_input, "q");

        handle_key_event(&mut app, key(KeyCode::Enter), now);
        assert_eq!(app.input_mode, InputMode::Normal);

        handle_key_event(&mut app, key(KeyCode::Char('t')), now);
        handle_key_event(&mut app, key(KeyCode::Char('x')), now);
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
            now,
        );
        assert!(app.tags_input.is_empty());
    }

    #[tokio::test]
    async fn test_filter_keys() {
        let mut app = app();
        let now = Instant::now();

        handle_key_event(&mut app, key(KeyCode::Char('f')), now);
        assert_eq!(app.query.state, StateFilter::Only(crate::data::MonitorState::Alert));
        handle_key_event(&mut app, key(KeyCode::Char('F')), now);
        assert_eq!(app.query.state, StateFilter::All);

        handle_key_event(&mut app, key(KeyCode::Char('o')), now);
        assert!(app.query.hide_ok);

        handle_key_event(&mut app, key(KeyCode::Char('-')), now);
        assert_eq!(app.query.page_size, 25);
    }

    #[tokio::test]
    async fn test_help_swallows_next_key() {
        let mut app = app();
        let now = Instant::now();

        handle_key_event(&mut app, key(KeyCode::Char('?')), now);
        assert!(app.show_help);
        handle_key_event(&mut app, key(KeyCode::Char('q')), now);
        assert!(!app.show_help);
        assert!(app.running);

        handle_key_event(&mut app, key(KeyCode::Char('q')), now);
        assert!(!app.running);
    }

    #[tokio::test]
    async fn test_view_keys() {
        let mut app = app();
        let now = Instant::now();

        handle_key_event(&mut app, key(KeyCode::Char('2')), now);
        assert_eq!(app.current_view, View::Board);
        handle_key_event(&mut app, key(KeyCode::Tab), now);
        assert_eq!(app.current_view, View::Services);
    }
}
