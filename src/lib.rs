//! # dogwatch
//!
//! A terminal dashboard and library for Datadog monitors.
//!
//! Monitors are fetched from a small proxy (or the Datadog API directly, or
//! a JSON file), filtered by name, tags and state, grouped by service and
//! shown page by page. The query lives in a shareable `dogwatch://` link and
//! is remembered between runs.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌──────────┐  │
//! │  │   app   │───▶│   data   │───▶│   ui    │───▶│ Terminal │  │
//! │  │ (state) │    │(derived) │    │(render) │    │          │  │
//! │  └──┬───┬──┘    └──────────┘    └─────────┘    └──────────┘  │
//! │     │   │                                                    │
//! │     │   ▼                                                    │
//! │     │ ┌─────────┐                                            │
//! │     │ │  query  │◀── LocationBar + Storage                   │
//! │     │ └─────────┘                                            │
//! │     ▼                                                        │
//! │  ┌─────────┐    ┌─────────┐                                  │
//! │  │  fetch  │───▶│ source  │◀── Proxy | Datadog | File        │
//! │  └─────────┘    └─────────┘                                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, input handling and the refresh timer
//! - **[`query`]**: The persisted [`QueryState`] and its link/storage layers
//! - **[`fetch`]**: Debounced, cancellable fetching ([`Fetcher`], [`Debouncer`])
//! - **[`source`]**: The [`MonitorSource`] trait and its HTTP and file implementations
//! - **[`data`]**: Monitors plus filtering, grouping, pagination and stats
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`config`]**: Settings from file and environment
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Monitors through the local proxy
//! dogwatch --endpoint http://localhost:3001/api
//!
//! # Straight from Datadog, starting on the alerting production monitors
//! DATADOG_API_KEY=... DATADOG_APP_KEY=... dogwatch --datadog --query 'state=Alert&prod=1'
//!
//! # Offline, from a file
//! dogwatch --file monitors.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use dogwatch::data::{Dashboard, Monitor, MonitorId, MonitorState};
//! use dogwatch::QueryState;
//!
//! let monitors = vec![Monitor {
//!     id: MonitorId::Number(1),
//!     name: "API latency".to_string(),
//!     state: MonitorState::Alert,
//!     tags: vec!["service:api".to_string()],
//!     url: String::new(),
//! }];
//!
//! let dashboard = Dashboard::build(&monitors, &QueryState::default(), &[]);
//! assert_eq!(dashboard.groups[0].service, "api");
//! assert_eq!(dashboard.stats.count(MonitorState::Alert), 1);
//! ```
//!
//! ### Fetching
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use dogwatch::{Fetcher, MonitorQuery, ProxySource};
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let source = ProxySource::new("http://localhost:3001/api", Duration::from_secs(10)).unwrap();
//! let mut fetcher = Fetcher::new(Arc::new(source), runtime.handle().clone());
//!
//! fetcher.request(MonitorQuery::new("latency", "", true, "env:prod"), "example");
//! while !fetcher.poll() {
//!     std::thread::sleep(Duration::from_millis(50));
//! }
//! println!("{} monitors", fetcher.state().monitors.len());
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod export;
pub mod fetch;
pub mod query;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, AppOptions};
pub use config::Settings;
pub use data::{Dashboard, Monitor, MonitorState};
pub use fetch::{Debouncer, FetchState, Fetcher};
pub use query::{QueryState, QueryStore};
pub use source::{
    DatadogSource, FetchError, FileSource, MonitorQuery, MonitorSource, ProxySource,
};
pub use ui::Theme;
