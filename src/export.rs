//! JSON export of the current dashboard.

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::{Dashboard, Group, Stats};
use crate::query::QueryState;

/// The exported document.
#[derive(Debug, Serialize)]
pub struct Export<'a> {
    pub exported_at_ms: u64,
    pub query: &'a QueryState,
    pub stats: &'a Stats,
    /// All filtered monitors grouped by service, ignoring pagination.
    pub groups: &'a [Group],
}

impl<'a> Export<'a> {
    pub fn new(query: &'a QueryState, dashboard: &'a Dashboard) -> Self {
        Self {
            exported_at_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as u64,
            query,
            stats: &dashboard.stats,
            groups: &dashboard.groups,
        }
    }
}

pub fn to_json(query: &QueryState, dashboard: &Dashboard) -> Result<String> {
    Ok(serde_json::to_string_pretty(&Export::new(query, dashboard))?)
}

/// Write the export as pretty JSON to `path`.
pub fn write_file(path: &Path, query: &QueryState, dashboard: &Dashboard) -> Result<()> {
    let json = to_json(query, dashboard)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::monitor::tests::monitor;
    use crate::data::MonitorState;
    use tempfile::TempDir;

    #[test]
    fn test_export_contains_query_stats_and_groups() {
        let raw = vec![
            monitor(1, "db errors", MonitorState::Alert, &["service:db"]),
            monitor(2, "checkout", MonitorState::Ok, &["service:pay"]),
        ];
        let query = QueryState {
            page_size: 1,
            ..QueryState::default()
        };
        let dashboard = Dashboard::build(&raw, &query, &[]);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.json");
        write_file(&path, &query, &dashboard).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["query"]["state"], "ALL");
        assert_eq!(value["query"]["page_size"], 1);
        assert_eq!(value["stats"]["total"], 2);
        assert_eq!(value["stats"]["by_state"]["OK"], 1);

        // Groups are not truncated by pagination
        let groups = value["groups"].as_array().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0]["service"], "db");
        assert_eq!(groups[0]["monitors"][0]["overall_state"], "Alert");
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("export.json");
        let dashboard = Dashboard::default();
        assert!(write_file(&path, &QueryState::default(), &dashboard).is_err());
    }
}
