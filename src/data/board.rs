//! The Alert / Warn / OK board.

use serde::Serialize;

use super::monitor::{Monitor, MonitorState};

/// States that get a board column, left to right.
pub const BOARD_STATES: [MonitorState; 3] = [MonitorState::Alert, MonitorState::Warn, MonitorState::Ok];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub state: MonitorState,
    pub monitors: Vec<Monitor>,
}

/// Monitors split into one column per board state, each sorted by priority
/// then name. NoData and Unknown monitors have no column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Board {
    pub columns: Vec<Column>,
}

impl Default for Board {
    fn default() -> Self {
        Self::build(&[])
    }
}

impl Board {
    pub fn build(monitors: &[Monitor]) -> Self {
        let columns = BOARD_STATES
            .iter()
            .map(|&state| {
                let mut column: Vec<Monitor> =
                    monitors.iter().filter(|m| m.state == state).cloned().collect();
                column.sort_by_cached_key(|m| (m.priority(), m.name.to_lowercase()));
                Column {
                    state,
                    monitors: column,
                }
            })
            .collect();

        Self { columns }
    }

    /// All board monitors, column by column.
    pub fn monitors(&self) -> impl Iterator<Item = &Monitor> {
        self.columns.iter().flat_map(|c| c.monitors.iter())
    }

    pub fn len(&self) -> usize {
        self.columns.iter().map(|c| c.monitors.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::monitor::tests::monitor;

    #[test]
    fn test_columns_sorted_by_priority_then_name() {
        let monitors = vec![
            monitor(1, "zeta", MonitorState::Alert, &["priority:p1"]),
            monitor(2, "alpha", MonitorState::Alert, &[]),
            monitor(3, "Beta", MonitorState::Alert, &["priority:P1"]),
            monitor(4, "quiet", MonitorState::Ok, &[]),
            monitor(5, "gone", MonitorState::NoData, &[]),
            monitor(6, "warm", MonitorState::Warn, &["priority:p2"]),
        ];
        let board = Board::build(&monitors);

        let alert: Vec<&str> = board.columns[0].monitors.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(alert, vec!["Beta", "zeta", "alpha"]);
        assert_eq!(board.columns[1].monitors.len(), 1);
        assert_eq!(board.columns[2].state, MonitorState::Ok);

        // NoData has no column
        assert_eq!(board.len(), 5);
        assert_eq!(board.monitors().next().map(|m| m.name.as_str()), Some("Beta"));
    }

    #[test]
    fn test_empty_board_has_three_columns() {
        let board = Board::default();
        assert_eq!(board.columns.len(), 3);
        assert!(board.is_empty());
    }
}
