//! Derived view state, rebuilt whenever monitors or filters change.

use super::board::Board;
use super::filter::{exclude_tagged, filter};
use super::group::{group, paginate, Group, PageView};
use super::monitor::Monitor;
use super::stats::Stats;
use crate::query::QueryState;

/// Everything the views render, derived from raw monitors and the query.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    /// Filtered and sorted monitors (before pagination).
    pub filtered: Vec<Monitor>,
    /// All filtered monitors grouped by service.
    pub groups: Vec<Group>,
    /// The paginated prefix of `groups`.
    pub page: PageView,
    /// Counts over `filtered`.
    pub stats: Stats,
    /// `filtered` split into Alert / Warn / OK columns.
    pub board: Board,
}

impl Dashboard {
    pub fn build(raw: &[Monitor], query: &QueryState, excluded: &[String]) -> Self {
        let kept = exclude_tagged(raw, excluded);
        let filtered = filter(&kept, query.state, query.hide_ok);
        let stats = Stats::from_monitors(&filtered);
        let groups = group(filtered.iter().cloned());
        let page = paginate(&groups, query.page, query.page_size);
        let board = Board::build(&filtered);

        Self {
            filtered,
            groups,
            page,
            stats,
            board,
        }
    }

    /// Visible monitor at a display position.
    pub fn visible_monitor(&self, index: usize) -> Option<&Monitor> {
        self.page.monitors().nth(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::monitor::tests::monitor;
    use crate::data::MonitorState;
    use crate::query::StateFilter;

    fn raw() -> Vec<Monitor> {
        vec![
            monitor(1, "db latency", MonitorState::Ok, &["service:db"]),
            monitor(2, "db errors", MonitorState::Alert, &["service:db"]),
            monitor(3, "checkout", MonitorState::Warn, &["service:pay"]),
            monitor(4, "orphan", MonitorState::Unknown, &[]),
            monitor(5, "noc only", MonitorState::Alert, &["only_noc"]),
        ]
    }

    #[test]
    fn test_build_runs_full_pipeline() {
        let query = QueryState {
            hide_ok: true,
            ..QueryState::default()
        };
        let dash = Dashboard::build(&raw(), &query, &["only_noc".to_string()]);

        assert_eq!(dash.stats.total, 3);
        assert_eq!(dash.stats.count(MonitorState::Ok), 0);

        let keys: Vec<&str> = dash.groups.iter().map(|g| g.service.as_str()).collect();
        assert_eq!(keys, vec!["db", "pay", "sin-service"]);
        assert_eq!(dash.page.visible, 3);
        assert!(!dash.page.has_more);
        assert_eq!(dash.board.len(), 2);
    }

    #[test]
    fn test_stats_ignore_pagination() {
        let query = QueryState {
            page_size: 1,
            ..QueryState::default()
        };
        let dash = Dashboard::build(&raw(), &query, &[]);
        assert_eq!(dash.stats.total, 5);
        assert_eq!(dash.page.visible, 1);
        assert!(dash.page.has_more);
        assert_eq!(dash.visible_monitor(0).map(|m| m.name.as_str()), Some("db errors"));
        assert!(dash.visible_monitor(1).is_none());
    }

    #[test]
    fn test_state_filter_applies_before_grouping() {
        let query = QueryState {
            state: StateFilter::Only(MonitorState::Warn),
            ..QueryState::default()
        };
        let dash = Dashboard::build(&raw(), &query, &[]);
        assert_eq!(dash.groups.len(), 1);
        assert_eq!(dash.groups[0].service, "pay");
    }
}
