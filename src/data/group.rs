//! Service grouping and client-side pagination.

use std::collections::HashMap;

use serde::Serialize;

use super::monitor::Monitor;

/// Monitors sharing a service key, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub service: String,
    pub monitors: Vec<Monitor>,
}

/// Partition monitors by service key.
///
/// Member order follows the input; groups are sorted by case-insensitive key
/// (stable, so keys differing only in case keep first-seen order). The
/// no-service sentinel sorts wherever its string falls.
pub fn group<I>(monitors: I) -> Vec<Group>
where
    I: IntoIterator<Item = Monitor>,
{
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for monitor in monitors {
        let service = monitor.service().to_string();
        match index.get(&service) {
            Some(&i) => groups[i].monitors.push(monitor),
            None => {
                index.insert(service.clone(), groups.len());
                groups.push(Group {
                    service,
                    monitors: vec![monitor],
                });
            }
        }
    }

    groups.sort_by_cached_key(|g| g.service.to_lowercase());
    groups
}

/// The visible prefix of the grouped list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageView {
    /// Visible monitors, regrouped.
    pub groups: Vec<Group>,
    /// Number of visible monitors.
    pub visible: usize,
    /// Number of monitors across all groups.
    pub total: usize,
    /// Whether another page would show more monitors.
    pub has_more: bool,
}

impl PageView {
    /// Visible monitors in display order.
    pub fn monitors(&self) -> impl Iterator<Item = &Monitor> {
        self.groups.iter().flat_map(|g| g.monitors.iter())
    }
}

/// Show the first `page * page_size` monitors of the grouped list.
pub fn paginate(groups: &[Group], page: usize, page_size: usize) -> PageView {
    let total: usize = groups.iter().map(|g| g.monitors.len()).sum();
    let limit = page.max(1).saturating_mul(page_size.max(1));

    let prefix: Vec<Monitor> = groups
        .iter()
        .flat_map(|g| g.monitors.iter())
        .take(limit)
        .cloned()
        .collect();
    let visible = prefix.len();

    PageView {
        groups: group(prefix),
        visible,
        total,
        has_more: limit < total,
    }
}
