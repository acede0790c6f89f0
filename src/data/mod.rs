//! Data models and the derivation pipeline for monitor lists.
//!
//! This module turns the raw monitor list returned by the API into the
//! filtered, grouped and paginated structure the views render.
//!
//! ## Submodules
//!
//! - [`monitor`]: Core model ([`Monitor`], [`MonitorState`], [`Priority`])
//! - [`filter`]: State / hide-OK filtering and severity sort
//! - [`group`]: Grouping by `service:` tag and client-side pagination
//! - [`stats`]: Per-state counts
//! - [`board`]: Alert / Warn / OK columns sorted by priority
//! - [`dashboard`]: The cached bundle of all derived values
//! - [`first_seen`]: Session timestamps for alerting monitors
//! - [`duration`]: Duration parsing for configuration and age formatting
//!
//! ## Data Flow
//!
//! ```text
//! raw Vec<Monitor>
//!        │
//!        ▼
//! exclude_tagged() ──▶ filter() ──▶ group() ──▶ paginate() ──▶ PageView
//!                          │
//!                          ├──▶ Stats::from_monitors()
//!                          └──▶ Board::build()
//! ```

pub mod board;
pub mod dashboard;
pub mod duration;
pub mod filter;
pub mod first_seen;
pub mod group;
pub mod monitor;
pub mod stats;

pub use board::{Board, Column, BOARD_STATES};
pub use dashboard::Dashboard;
pub use filter::{exclude_tagged, filter};
pub use first_seen::FirstSeen;
pub use group::{group, paginate, Group, PageView};
pub use monitor::{Monitor, MonitorId, MonitorState, Priority, NO_SERVICE};
pub use stats::Stats;
