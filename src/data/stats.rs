//! Per-state counts for the header.

use std::collections::BTreeMap;

use serde::Serialize;

use super::monitor::{Monitor, MonitorState};

/// Monitor counts over the filtered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub by_state: BTreeMap<MonitorState, usize>,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            total: 0,
            by_state: MonitorState::ALL.into_iter().map(|s| (s, 0)).collect(),
        }
    }
}

impl Stats {
    /// Count monitors per state; every state is present, zero when unseen.
    pub fn from_monitors<'a, I>(monitors: I) -> Self
    where
        I: IntoIterator<Item = &'a Monitor>,
    {
        let mut stats = Self::default();
        for monitor in monitors {
            stats.total += 1;
            *stats.by_state.entry(monitor.state).or_insert(0) += 1;
        }
        stats
    }

    pub fn count(&self, state: MonitorState) -> usize {
        self.by_state.get(&state).copied().unwrap_or(0)
    }

    /// Most severe state with at least one monitor.
    pub fn worst(&self) -> Option<MonitorState> {
        MonitorState::ALL.into_iter().find(|s| self.count(*s) > 0)
    }
}
