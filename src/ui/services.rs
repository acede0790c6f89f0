//! Services view rendering.
//!
//! Displays the current page of monitors as a table, one header row per
//! service group followed by its monitors.

use std::time::SystemTime;

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::Group;

/// Table row of the `index`-th monitor, counting one header row per group.
fn table_row(groups: &[Group], index: usize) -> Option<usize> {
    let mut seen = 0;
    for (group_index, group) in groups.iter().enumerate() {
        if index < seen + group.monitors.len() {
            // Header rows of this and earlier groups come first
            return Some(index + group_index + 1);
        }
        seen += group.monitors.len();
    }
    None
}

/// Render the Services view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let page = &app.dashboard.page;

    let title = format!(
        " Monitors ({}/{}) · {} services · page {} ",
        page.visible,
        page.total,
        page.groups.len(),
        app.query.page,
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if page.groups.is_empty() {
        let message = if app.fetch_state().loading {
            " Loading…"
        } else {
            " No monitors"
        };
        let paragraph = Paragraph::new(message)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("State"),
        Cell::from("Prio"),
        Cell::from("Monitor"),
        Cell::from("Seen"),
    ])
    .style(app.theme.header)
    .height(1);

    let now = SystemTime::now();
    let mut rows = Vec::with_capacity(page.visible + page.groups.len());
    for group in &page.groups {
        rows.push(
            Row::new(vec![
                Cell::from(""),
                Cell::from(""),
                Cell::from(format!("{} ({})", group.service, group.monitors.len())),
                Cell::from(""),
            ])
            .style(app.theme.group),
        );

        for monitor in &group.monitors {
            let priority = monitor.priority();
            rows.push(Row::new(vec![
                Cell::from(monitor.state.label()).style(app.theme.state_style(monitor.state)),
                Cell::from(priority.label()).style(app.theme.priority_style(priority)),
                Cell::from(format!("  {}", monitor.name)),
                Cell::from(app.first_seen.age(monitor, now)),
            ]));
        }
    }

    let widths = [
        Constraint::Length(8),
        Constraint::Length(5),
        Constraint::Min(20),
        Constraint::Length(6),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(table_row(&page.groups, app.selected_index));

    frame.render_stateful_widget(table, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::group;
    use crate::data::monitor::tests::monitor;
    use crate::data::MonitorState;

    #[test]
    fn test_table_row_skips_group_headers() {
        let groups = group(vec![
            monitor(1, "a", MonitorState::Alert, &["service:api"]),
            monitor(2, "b", MonitorState::Alert, &["service:api"]),
            monitor(3, "c", MonitorState::Warn, &["service:db"]),
        ]);

        // api header, a, b, db header, c
        assert_eq!(table_row(&groups, 0), Some(1));
        assert_eq!(table_row(&groups, 1), Some(2));
        assert_eq!(table_row(&groups, 2), Some(4));
        assert_eq!(table_row(&groups, 3), None);
    }
}
