//! Board view rendering: one column per state.

use std::time::SystemTime;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::App;
use crate::data::Board;

/// Column and row of the `index`-th board monitor.
fn locate(board: &Board, index: usize) -> Option<(usize, usize)> {
    let mut offset = 0;
    for (column_index, column) in board.columns.iter().enumerate() {
        if index < offset + column.monitors.len() {
            return Some((column_index, index - offset));
        }
        offset += column.monitors.len();
    }
    None
}

/// Render the Board view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let board = &app.dashboard.board;
    let areas = Layout::horizontal(vec![
        Constraint::Ratio(1, board.columns.len().max(1) as u32);
        board.columns.len()
    ])
    .split(area);

    let selected = locate(board, app.selected_index);
    let now = SystemTime::now();

    for (i, (column, column_area)) in board.columns.iter().zip(areas.iter()).enumerate() {
        let state_style = app.theme.state_style(column.state);

        let items: Vec<ListItem> = column
            .monitors
            .iter()
            .map(|monitor| {
                let priority = monitor.priority();
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", priority.label()), app.theme.priority_style(priority)),
                    Span::raw(monitor.name.clone()),
                    Span::styled(
                        format!("  {}", app.first_seen.age(monitor, now)),
                        Style::default().add_modifier(Modifier::DIM),
                    ),
                ]))
            })
            .collect();

        let block = Block::default()
            .title(Span::styled(
                format!(" {} ({}) ", column.state.label(), column.monitors.len()),
                state_style,
            ))
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.state_color(column.state)));

        let list = List::new(items)
            .block(block)
            .highlight_style(app.theme.selected)
            .highlight_symbol("▶ ");

        let mut state = ListState::default();
        if let Some((column_index, row)) = selected {
            if column_index == i {
                state.select(Some(row));
            }
        }

        frame.render_stateful_widget(list, *column_area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::monitor::tests::monitor;
    use crate::data::MonitorState;

    #[test]
    fn test_locate_walks_columns() {
        let board = Board::build(&[
            monitor(1, "a", MonitorState::Alert, &[]),
            monitor(2, "b", MonitorState::Ok, &[]),
            monitor(3, "c", MonitorState::Ok, &[]),
        ]);

        assert_eq!(locate(&board, 0), Some((0, 0)));
        // Warn column is empty
        assert_eq!(locate(&board, 1), Some((2, 0)));
        assert_eq!(locate(&board, 2), Some((2, 1)));
        assert_eq!(locate(&board, 3), None);
    }
}
