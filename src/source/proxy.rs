//! Monitors through the HTTP proxy that holds the Datadog keys.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{decode_monitors, FetchError, MonitorQuery, MonitorSource};
use crate::data::Monitor;

/// Default proxy base URL.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3001/api";

/// Fetches `GET {endpoint}/monitors?name=..&tags=..`.
#[derive(Debug, Clone)]
pub struct ProxySource {
    client: Client,
    endpoint: String,
    description: String,
}

impl ProxySource {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(format!("cannot build HTTP client: {}", e)))?;
        let endpoint = endpoint.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            description: format!("proxy: {}", endpoint),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MonitorSource for ProxySource {
    async fn fetch(&self, query: &MonitorQuery) -> Result<Vec<Monitor>, FetchError> {
        let url = format!("{}/monitors", self.endpoint);
        tracing::debug!(%url, name = %query.name, tags = %query.tags, "fetching monitors");

        let response = self.client.get(&url).query(&query.params()).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(FetchError::from_response(
                status.as_u16(),
                &String::from_utf8_lossy(&body),
            ));
        }

        Ok(decode_monitors(&body))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn source(server: &MockServer) -> ProxySource {
        ProxySource::new(&server.url("/api/"), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let source = ProxySource::new("http://localhost:3001/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(source.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(source.description(), "proxy: http://localhost:3001/api");
    }

    #[tokio::test]
    async fn test_fetch_sends_filters() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/monitors")
                    .query_param("name", "db")
                    .query_param("tags", "team:core,env:prod");
                then.status(200).json_body(serde_json::json!({
                    "monitors": [
                        {"id": 1, "name": "db errors", "overall_state": "Alert",
                         "tags": ["service:db"], "overall_url": "https://dd/monitors/1"}
                    ]
                }));
            })
            .await;

        let query = MonitorQuery::new("db", "team:core", true, "env:prod");
        let monitors = source(&server).fetch(&query).await.unwrap();

        mock.assert_async().await;
        assert_eq!(monitors.len(), 1);
        assert_eq!(monitors[0].name, "db errors");
    }

    #[tokio::test]
    async fn test_fetch_without_filters() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/monitors");
                then.status(200).body("[]");
            })
            .await;

        let monitors = source(&server).fetch(&MonitorQuery::default()).await.unwrap();
        mock.assert_async().await;
        assert!(monitors.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_message_is_verbatim() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/monitors");
                then.status(500)
                    .json_body(serde_json::json!({"error": "Missing DATADOG_API_KEY / DATADOG_APP_KEY"}));
            })
            .await;

        let err = source(&server).fetch(&MonitorQuery::default()).await.unwrap_err();
        assert_eq!(
            err,
            FetchError::Server {
                status: 500,
                message: "Missing DATADOG_API_KEY / DATADOG_APP_KEY".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/monitors");
                then.status(200).body("not json");
            })
            .await;

        let monitors = source(&server).fetch(&MonitorQuery::default()).await.unwrap();
        assert!(monitors.is_empty());
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Port 9 (discard) is closed on test hosts
        let source = ProxySource::new("http://127.0.0.1:9/api", Duration::from_secs(2)).unwrap();
        let err = source.fetch(&MonitorQuery::default()).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)), "{:?}", err);
    }
}
