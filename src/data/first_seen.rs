//! Session tracking of when alerting monitors were first observed.

use std::collections::HashMap;
use std::time::SystemTime;

use super::duration::format_age;
use super::monitor::{Monitor, MonitorId, MonitorState};

/// Records the first poll in this session that saw each monitor in Alert or Warn.
///
/// Entries are never cleared, so a monitor that recovers and fires again
/// keeps its original timestamp for the rest of the session.
#[derive(Debug, Clone, Default)]
pub struct FirstSeen {
    seen: HashMap<MonitorId, SystemTime>,
}

impl FirstSeen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record Alert/Warn monitors not seen before.
    pub fn record<'a, I>(&mut self, monitors: I, now: SystemTime)
    where
        I: IntoIterator<Item = &'a Monitor>,
    {
        for monitor in monitors {
            if matches!(monitor.state, MonitorState::Alert | MonitorState::Warn) {
                self.seen.entry(monitor.id.clone()).or_insert(now);
            }
        }
    }

    pub fn get(&self, id: &MonitorId) -> Option<SystemTime> {
        self.seen.get(id).copied()
    }

    /// Compact age since first seen, or "-" for OK monitors and unknown ids.
    pub fn age(&self, monitor: &Monitor, now: SystemTime) -> String {
        if monitor.state == MonitorState::Ok {
            return "-".to_string();
        }
        match self.get(&monitor.id) {
            Some(at) => format_age(now.duration_since(at).unwrap_or_default()),
            None => "-".to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
