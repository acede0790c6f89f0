//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::{MonitorState, Priority};

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    pub alert: Color,
    pub warn: Color,
    pub no_data: Color,
    pub unknown: Color,
    pub ok: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for service group rows.
    pub group: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            alert: Color::Red,
            warn: Color::Yellow,
            no_data: Color::Magenta,
            unknown: Color::Gray,
            ok: Color::Green,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            group: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            alert: Color::Red,
            warn: Color::Yellow,
            no_data: Color::Magenta,
            unknown: Color::DarkGray,
            ok: Color::Green,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            group: Style::default().fg(Color::Black).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn state_color(&self, state: MonitorState) -> Color {
        match state {
            MonitorState::Alert => self.alert,
            MonitorState::Warn => self.warn,
            MonitorState::NoData => self.no_data,
            MonitorState::Unknown => self.unknown,
            MonitorState::Ok => self.ok,
        }
    }

    /// Get style for a monitor state
    pub fn state_style(&self, state: MonitorState) -> Style {
        let style = Style::default().fg(self.state_color(state));
        match state {
            MonitorState::Alert => style.add_modifier(Modifier::BOLD),
            _ => style,
        }
    }

    pub fn priority_style(&self, priority: Priority) -> Style {
        match priority {
            Priority::P1 => Style::default().fg(self.alert).add_modifier(Modifier::BOLD),
            Priority::P2 => Style::default().fg(self.warn),
            _ => Style::default(),
        }
    }
}
