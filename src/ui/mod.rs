//! Terminal UI rendering using ratatui.
//!
//! This module contains all the view-specific rendering logic for the TUI.
//! Each view is implemented in its own submodule with a `render` function.
//!
//! ## Submodules
//!
//! - [`services`]: Monitors grouped by service, paginated
//! - [`board`]: Alert / Warn / OK columns
//! - [`detail`]: Modal overlay showing one monitor
//! - [`common`]: Shared components (header, tabs, filter bar, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │ Filters (common::render_filter_bar)  │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ View Content                         │
//! │ (services/board::render)             │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - detail::render_overlay
//!    - common::render_help
//! ```

pub mod board;
pub mod common;
pub mod detail;
pub mod services;
pub mod theme;

pub use theme::Theme;
