//! File-based monitor source.
//!
//! Reads a monitor payload from a JSON file and applies the name and tag
//! filters locally, so the dashboard works without a proxy.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{decode_monitors, FetchError, MonitorQuery, MonitorSource};
use crate::data::Monitor;

/// A source that re-reads a JSON file on every fetch.
///
/// The file holds the same payload the proxy returns, either
/// `{"monitors": [...]}` or a bare array.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Name is a case-insensitive substring; every tag clause must be present.
fn matches(monitor: &Monitor, name: &str, tags: &[&str]) -> bool {
    let name_ok = name.is_empty() || monitor.name.to_lowercase().contains(&name.to_lowercase());
    let tags_ok = tags
        .iter()
        .all(|wanted| monitor.tags.iter().any(|own| own.eq_ignore_ascii_case(wanted)));
    name_ok && tags_ok
}

#[async_trait]
impl MonitorSource for FileSource {
    async fn fetch(&self, query: &MonitorQuery) -> Result<Vec<Monitor>, FetchError> {
        let content = tokio::fs::read(&self.path)
            .await
            .map_err(|e| FetchError::Network(format!("Read error: {}", e)))?;

        let tags = query.tag_list();
        let monitors = decode_monitors(&content)
            .into_iter()
            .filter(|m| matches(m, &query.name, &tags))
            .collect();
        Ok(monitors)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "monitors": [
                { "id": 1, "name": "DB latency", "overall_state": "Alert",
                  "tags": ["service:db", "env:prod"] },
                { "id": 2, "name": "db errors", "overall_state": "OK",
                  "tags": ["service:db", "env:staging"] },
                { "id": 3, "name": "checkout", "overall_state": "Warn",
                  "tags": ["service:pay", "env:prod"] }
            ]
        }"#
    }

    fn sample_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();
        file
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/monitors.json");
        assert_eq!(source.path(), Path::new("/tmp/monitors.json"));
        assert_eq!(source.description(), "file: /tmp/monitors.json");
    }

    #[tokio::test]
    async fn test_file_source_reads_everything_unfiltered() {
        let file = sample_file();
        let source = FileSource::new(file.path());
        let monitors = source.fetch(&MonitorQuery::default()).await.unwrap();
        assert_eq!(monitors.len(), 3);
    }

    #[tokio::test]
    async fn test_file_source_filters_locally() {
        let file = sample_file();
        let source = FileSource::new(file.path());

        let by_name = source.fetch(&MonitorQuery::new("db", "", false, "env:prod")).await.unwrap();
        assert_eq!(by_name.len(), 2);

        let prod_db = source.fetch(&MonitorQuery::new("db", "", true, "env:prod")).await.unwrap();
        assert_eq!(prod_db.len(), 1);
        assert_eq!(prod_db[0].name, "DB latency");

        let all_tags = source
            .fetch(&MonitorQuery::new("", "service:pay,env:prod", false, "env:prod"))
            .await
            .unwrap();
        assert_eq!(all_tags.len(), 1);
        assert_eq!(all_tags[0].name, "checkout");
    }

    #[test]
    fn test_file_source_missing_file() {
        let source = FileSource::new("/nonexistent/path/monitors.json");
        let err = tokio_test::block_on(source.fetch(&MonitorQuery::default())).unwrap_err();
        assert!(err.to_string().contains("Read error"));
    }

    #[test]
    fn test_file_source_invalid_json_is_empty() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let source = FileSource::new(file.path());
        let monitors = tokio_test::block_on(source.fetch(&MonitorQuery::default())).unwrap();
        assert!(monitors.is_empty());
    }
}
