//! Detail overlay rendering.
//!
//! Displays a modal overlay with everything known about the selected monitor.

use std::time::SystemTime;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 40;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 12;

/// Render the monitor detail as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(monitor) = app.selected_monitor() else {
        return;
    };

    let overlay_width = (area.width * 80 / 100).clamp(MIN_OVERLAY_WIDTH, 100);
    let overlay_height = (area.height * 70 / 100).clamp(MIN_OVERLAY_HEIGHT, 30);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([Constraint::Min(8), Constraint::Length(1)]).split(overlay_area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);
    let priority = monitor.priority();
    let first_seen = app.first_seen.age(monitor, SystemTime::now());
    let url = if monitor.url.is_empty() {
        "-"
    } else {
        monitor.url.as_str()
    };

    let mut lines = vec![
        Line::from(Span::styled(format!(" {} ", monitor.name), bold)),
        Line::from(""),
        Line::from(vec![
            Span::raw(" State: "),
            Span::styled(monitor.state.label(), app.theme.state_style(monitor.state)),
            Span::raw("    Priority: "),
            Span::styled(priority.label(), app.theme.priority_style(priority)),
            Span::raw("    Service: "),
            Span::styled(monitor.service().to_string(), bold),
        ]),
        Line::from(vec![
            Span::raw(" ID: "),
            Span::raw(monitor.id.to_string()),
            Span::raw("    First seen: "),
            Span::raw(first_seen),
        ]),
        Line::from(vec![Span::raw(" Link: "), Span::styled(url.to_string(), dim)]),
        Line::from(""),
        Line::from(Span::styled(format!(" Tags ({})", monitor.tags.len()), bold)),
    ];

    if monitor.tags.is_empty() {
        lines.push(Line::from(Span::styled("  none", dim)));
    } else {
        lines.extend(monitor.tags.iter().map(|tag| Line::from(format!("  {}", tag))));
    }

    let block = Block::default()
        .title(" Monitor Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let body = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(body, chunks[0]);

    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " ↑/↓ next monitor · Esc to close ",
        dim,
    )]));
    frame.render_widget(footer, chunks[1]);
}
