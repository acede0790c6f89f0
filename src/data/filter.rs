//! State filtering and severity ordering.

use super::monitor::{Monitor, MonitorState};
use crate::query::StateFilter;

/// Filter and sort raw monitors for display.
///
/// Keeps only the selected state (unless `All`), drops OK monitors when
/// `hide_ok` is set, then sorts by severity and case-insensitive name. The
/// sort is stable, so monitors with equal keys keep their API order.
pub fn filter(raw: &[Monitor], state: StateFilter, hide_ok: bool) -> Vec<Monitor> {
    let mut monitors: Vec<Monitor> = raw
        .iter()
        .filter(|m| state.matches(m.state))
        .filter(|m| !(hide_ok && m.state == MonitorState::Ok))
        .cloned()
        .collect();

    monitors.sort_by_cached_key(|m| (m.state.severity(), m.name.to_lowercase()));
    monitors
}

/// Drop monitors carrying any of the excluded tags (case-insensitive).
pub fn exclude_tagged(raw: &[Monitor], excluded: &[String]) -> Vec<Monitor> {
    if excluded.is_empty() {
        return raw.to_vec();
    }
    raw.iter().filter(|m| !m.has_any_tag(excluded)).cloned().collect()
}
