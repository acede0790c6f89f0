//! Direct access to the Datadog v1 monitor API.
//!
//! Does client-side what the proxy does server-side: injects the API and
//! application keys and rewrites each monitor's link to the Datadog app.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{decode_monitors, FetchError, MonitorQuery, MonitorSource};
use crate::data::Monitor;

pub const DEFAULT_API_BASE: &str = "https://api.datadoghq.com/api/v1";
pub const DEFAULT_APP_BASE: &str = "https://app.datadoghq.com";

const MISSING_KEYS: &str = "Missing DATADOG_API_KEY / DATADOG_APP_KEY";

/// API base URLs and keys for direct mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatadogCredentials {
    pub api_base: String,
    pub app_base: String,
    pub api_key: Option<String>,
    pub app_key: Option<String>,
}

impl Default for DatadogCredentials {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            app_base: DEFAULT_APP_BASE.to_string(),
            api_key: None,
            app_key: None,
        }
    }
}

impl DatadogCredentials {
    fn keys(&self) -> Option<(&str, &str)> {
        let api = self.api_key.as_deref().filter(|k| !k.is_empty())?;
        let app = self.app_key.as_deref().filter(|k| !k.is_empty())?;
        Some((api, app))
    }
}

#[derive(Debug, Clone)]
pub struct DatadogSource {
    client: Client,
    credentials: DatadogCredentials,
    description: String,
}

impl DatadogSource {
    pub fn new(mut credentials: DatadogCredentials, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(format!("cannot build HTTP client: {}", e)))?;

        credentials.api_base = credentials.api_base.trim_end_matches('/').to_string();
        credentials.app_base = credentials.app_base.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            description: format!("datadog: {}", credentials.api_base),
            credentials,
        })
    }

    fn monitor_link(&self, monitor: &Monitor) -> String {
        format!("{}/monitors/{}", self.credentials.app_base, monitor.id)
    }
}

#[async_trait]
impl MonitorSource for DatadogSource {
    async fn fetch(&self, query: &MonitorQuery) -> Result<Vec<Monitor>, FetchError> {
        let (api_key, app_key) = self
            .credentials
            .keys()
            .ok_or_else(|| FetchError::Credentials(MISSING_KEYS.to_string()))?;

        let url = format!("{}/monitor", self.credentials.api_base);
        tracing::debug!(%url, name = %query.name, tags = %query.tags, "fetching monitors from datadog");

        let response = self
            .client
            .get(&url)
            .query(&query.params())
            .header("DD-API-KEY", api_key)
            .header("DD-APPLICATION-KEY", app_key)
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(FetchError::from_response(
                status.as_u16(),
                &String::from_utf8_lossy(&body),
            ));
        }

        let mut monitors = decode_monitors(&body);
        for monitor in &mut monitors {
            monitor.url = self.monitor_link(monitor);
        }
        Ok(monitors)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn credentials(server: &MockServer) -> DatadogCredentials {
        DatadogCredentials {
            api_base: server.url("/api/v1"),
            app_base: "https://app.example.com/".to_string(),
            api_key: Some("api".to_string()),
            app_key: Some("app".to_string()),
        }
    }

    #[tokio::test]
    async fn test_missing_keys() {
        let source = DatadogSource::new(DatadogCredentials::default(), Duration::from_secs(1)).unwrap();
        let err = source.fetch(&MonitorQuery::default()).await.unwrap_err();
        assert_eq!(err, FetchError::Credentials(MISSING_KEYS.to_string()));

        let partial = DatadogCredentials {
            api_key: Some("api".to_string()),
            app_key: Some(String::new()),
            ..DatadogCredentials::default()
        };
        let source = DatadogSource::new(partial, Duration::from_secs(1)).unwrap();
        assert!(matches!(
            source.fetch(&MonitorQuery::default()).await,
            Err(FetchError::Credentials(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_injects_keys_and_maps_links() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/monitor")
                    .query_param("tags", "env:prod")
                    .header("DD-API-KEY", "api")
                    .header("DD-APPLICATION-KEY", "app");
                then.status(200).json_body(serde_json::json!([
                    {"id": 42, "name": "cpu", "overall_state": "No Data", "tags": ["env:prod"]},
                    {"id": 43, "name": "mem"}
                ]));
            })
            .await;

        let source = DatadogSource::new(credentials(&server), Duration::from_secs(5)).unwrap();
        let query = MonitorQuery::new("", "", true, "env:prod");
        let monitors = source.fetch(&query).await.unwrap();

        mock.assert_async().await;
        assert_eq!(monitors.len(), 2);
        assert_eq!(monitors[0].url, "https://app.example.com/monitors/42");
        assert_eq!(monitors[0].state, crate::data::MonitorState::NoData);
        assert_eq!(monitors[1].state, crate::data::MonitorState::Unknown);
    }

    #[tokio::test]
    async fn test_api_error_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/monitor");
                then.status(403).body(r#"{"errors":["Forbidden"]}"#);
            })
            .await;

        let source = DatadogSource::new(credentials(&server), Duration::from_secs(5)).unwrap();
        let err = source.fetch(&MonitorQuery::default()).await.unwrap_err();
        assert_eq!(
            err,
            FetchError::Server {
                status: 403,
                message: r#"{"errors":["Forbidden"]}"#.to_string()
            }
        );
    }
}
