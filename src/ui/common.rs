//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, filter bar, status bar,
//! and help overlay.

use std::time::{Instant, SystemTime};

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, InputMode, View};
use crate::data::duration::format_age;
use crate::data::MonitorState;

/// Render the header bar with per-state counts.
///
/// Counts cover the filtered list, before pagination.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let stats = &app.dashboard.stats;

    let (status_icon, status_style) = match stats.worst() {
        Some(state) => ("●", app.theme.state_style(state)),
        None => ("○", Style::default().add_modifier(Modifier::DIM)),
    };

    let mut spans = vec![
        Span::styled(format!(" {} ", status_icon), status_style),
        Span::styled("DOGWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(
            format!("{}", stats.total),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" monitors │"),
    ];

    for state in MonitorState::ALL {
        let count = stats.count(state);
        let style = if count > 0 {
            app.theme.state_style(state)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        spans.push(Span::raw(format!(" {} ", state.label())));
        spans.push(Span::styled(count.to_string(), style));
    }

    spans.push(Span::raw(format!(" │ {}", app.source_description())));
    if app.fetch_state().loading {
        spans.push(Span::styled(
            " │ loading…",
            Style::default().fg(app.theme.highlight),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![Line::from(" 1:Services "), Line::from(" 2:Board ")];

    let selected = match app.current_view {
        View::Services => 0,
        View::Board => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the filter bar: text inputs, state chip and toggles.
pub fn render_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    let input = |label: &str, text: &str, active: bool| -> Vec<Span<'static>> {
        let label_style = if active {
            Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let cursor = if active { "_" } else { "" };
        vec![
            Span::styled(format!(" {}:", label), label_style),
            Span::raw(format!("[{}{}]", text, cursor)),
        ]
    };

    let toggle = |label: &str, on: bool| -> Span<'static> {
        if on {
            Span::styled(
                format!(" {}", label),
                Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(format!(" {}", label), Style::default().add_modifier(Modifier::DIM))
        }
    };

    let state_style = match app.query.state {
        crate::query::StateFilter::All => Style::default().add_modifier(Modifier::BOLD),
        crate::query::StateFilter::Only(state) => app.theme.state_style(state),
    };

    let mut spans = input("/search", &app.search_input, app.input_mode == InputMode::Search);
    spans.extend(input("t:tags", &app.tags_input, app.input_mode == InputMode::Tags));
    spans.push(Span::raw(" f:"));
    spans.push(Span::styled(app.query.state.label(), state_style));
    spans.push(toggle("p:prod", app.query.only_prod));
    spans.push(toggle("o:hide-OK", app.query.hide_ok));
    spans.push(toggle("a:auto", app.auto_refresh));
    spans.push(Span::raw(format!(" │ ±:{}/page", app.query.page_size)));

    let page = &app.dashboard.page;
    spans.push(Span::raw(format!(" │ showing {}/{}", page.visible, page.total)));
    if page.has_more {
        spans.push(Span::styled(
            " m:more",
            Style::default().fg(app.theme.highlight),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// "just now", "12s ago", "5m ago", ...
pub fn format_updated(last_updated: Option<SystemTime>, now: SystemTime) -> String {
    match last_updated {
        Some(at) => {
            let age = now.duration_since(at).unwrap_or_default();
            if age.as_secs() == 0 {
                "just now".to_string()
            } else {
                format!("{} ago", format_age(age))
            }
        }
        None => "never".to_string(),
    }
}

/// Render the status bar at the bottom.
///
/// Shows: fetch error or last update, next auto-refresh, available controls.
/// Also displays temporary status messages.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let fetch = app.fetch_state();

    // Errors never hide data; they only take over the status bar
    if let Some(ref err) = fetch.error {
        let paragraph = Paragraph::new(format!(" Error: {} | r:retry q:quit", err))
            .style(Style::default().fg(app.theme.alert));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.input_mode {
        InputMode::Search | InputMode::Tags => "Type to filter | Enter/Esc:done Ctrl-U:clear",
        InputMode::Normal => "/:search t:tags f:state m:more r:refresh y:link ?:help q:quit",
    };

    let refresh = match app.next_refresh_in(Instant::now()) {
        Some(left) => format!("refresh in {}s", left.as_secs()),
        None => "auto-refresh off".to_string(),
    };

    let status = format!(
        " {} | Updated {} | {} | {}",
        app.current_view.label(),
        format_updated(fetch.last_updated, SystemTime::now()),
        refresh,
        controls,
    );

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  ←/→ h/l Tab Switch views"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Monitor detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        section(" Filters"),
        Line::from("  /           Search by name"),
        Line::from("  t           Filter by tags"),
        Line::from("  f / F       Next / previous state"),
        Line::from("  o           Hide OK monitors"),
        Line::from("  p           Only production"),
        Line::from("  c           Clear all filters"),
        Line::from("  m           Load more"),
        Line::from("  + / -       Page size"),
        Line::from(""),
        section(" General"),
        Line::from("  r           Refresh now"),
        Line::from("  a           Toggle auto-refresh"),
        Line::from("  y           Show share link"),
        Line::from("  e           Export to JSON"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 32u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
