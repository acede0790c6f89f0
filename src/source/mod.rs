//! Monitor sources: where the raw monitor list comes from.
//!
//! Every source answers the same question, "which monitors match this name
//! and tag filter", and returns them already normalized into [`Monitor`]s.
//!
//! - [`ProxySource`]: the HTTP proxy that holds the Datadog keys (default)
//! - [`DatadogSource`]: the Datadog v1 API directly, keys held locally
//! - [`FileSource`]: a JSON file on disk, filtered locally

mod datadog;
mod file;
mod payload;
mod proxy;

pub use datadog::{DatadogCredentials, DatadogSource, DEFAULT_API_BASE, DEFAULT_APP_BASE};
pub use file::FileSource;
pub use payload::decode_monitors;
pub use proxy::{ProxySource, DEFAULT_ENDPOINT};

use std::fmt::Debug;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::data::Monitor;

/// Longest slice of a response body shown as an error message.
const MAX_ERROR_BODY: usize = 300;

/// Errors from a single fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Direct mode without API keys.
    #[error("{0}")]
    Credentials(String),

    /// The request was superseded or the fetcher shut down.
    #[error("request cancelled")]
    Cancelled,
}

impl FetchError {
    /// Build a server error from a non-success response body.
    ///
    /// The message is the body's `error` field when it has one, otherwise
    /// the (trimmed, truncated) body text, otherwise `HTTP <status>`.
    pub fn from_response(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            error: String,
        }

        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) if !parsed.error.trim().is_empty() => parsed.error,
            _ => {
                let text = body.trim();
                if text.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    text.chars().take(MAX_ERROR_BODY).collect()
                }
            }
        };

        FetchError::Server { status, message }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Network("request timed out".to_string())
        } else if err.is_connect() {
            FetchError::Network(format!("connection failed: {}", err))
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

/// Server-side filter parameters for one fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorQuery {
    /// Name substring.
    pub name: String,
    /// Comma-separated tag clauses.
    pub tags: String,
}

impl MonitorQuery {
    /// Build from the user's inputs. When `only_prod` is set, `prod_tag` is
    /// added as an extra tag clause unless it is already there.
    pub fn new(search: &str, tags: &str, only_prod: bool, prod_tag: &str) -> Self {
        let mut clauses: Vec<&str> = tags
            .split(',')
            .map(str::trim)
            .filter(|clause| !clause.is_empty())
            .collect();

        let prod_tag = prod_tag.trim();
        if only_prod && !prod_tag.is_empty() && !clauses.contains(&prod_tag) {
            clauses.push(prod_tag);
        }

        Self {
            name: search.trim().to_string(),
            tags: clauses.join(","),
        }
    }

    /// Non-empty parameters as `(key, value)` pairs.
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::with_capacity(2);
        if !self.name.is_empty() {
            params.push(("name", self.name.as_str()));
        }
        if !self.tags.is_empty() {
            params.push(("tags", self.tags.as_str()));
        }
        params
    }

    /// Tag clauses as a list.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags.split(',').filter(|tag| !tag.is_empty()).collect()
    }
}

/// Trait for fetching monitors from a backend.
///
/// Implementations must be cheap to share; the fetcher calls `fetch` from
/// spawned tasks through an `Arc`.
#[async_trait]
pub trait MonitorSource: Send + Sync + Debug {
    /// Fetch monitors matching `query`.
    async fn fetch(&self, query: &MonitorQuery) -> Result<Vec<Monitor>, FetchError>;

    /// Human-readable description shown in the header.
    fn description(&self) -> &str;
}
