//! Monitor model and state classification.
//!
//! Monitors arrive from the API already aggregated; this module gives them a
//! typed state, a severity rank for sorting, and the tag-derived attributes
//! (service, priority) the views need.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Service key used for monitors without a `service:<name>` tag.
pub const NO_SERVICE: &str = "sin-service";

/// Tag prefix used to assign a monitor to a service group.
const SERVICE_TAG: &str = "service";

/// Aggregate state of a monitor, ordered by severity (most severe first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MonitorState {
    Alert,
    Warn,
    NoData,
    Unknown,
    #[serde(rename = "OK")]
    Ok,
}

impl MonitorState {
    /// All states in severity order.
    pub const ALL: [MonitorState; 5] = [
        MonitorState::Alert,
        MonitorState::Warn,
        MonitorState::NoData,
        MonitorState::Unknown,
        MonitorState::Ok,
    ];

    /// Severity rank used for sorting: Alert=0 .. OK=4.
    pub fn severity(self) -> u8 {
        match self {
            MonitorState::Alert => 0,
            MonitorState::Warn => 1,
            MonitorState::NoData => 2,
            MonitorState::Unknown => 3,
            MonitorState::Ok => 4,
        }
    }

    /// Wire/display label.
    pub fn label(self) -> &'static str {
        match self {
            MonitorState::Alert => "Alert",
            MonitorState::Warn => "Warn",
            MonitorState::NoData => "NoData",
            MonitorState::Unknown => "Unknown",
            MonitorState::Ok => "OK",
        }
    }

    /// Parse an exact state label as written by this crate.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.label() == s)
    }

    /// Classify a state string coming from the API.
    ///
    /// Datadog spells no-data as `"No Data"`; states this dashboard does not
    /// model (`Ignored`, `Skipped`, ...) and missing values become `Unknown`.
    pub fn from_api(s: Option<&str>) -> Self {
        match s.map(str::trim) {
            Some("No Data") => MonitorState::NoData,
            Some(s) => Self::parse(s).unwrap_or(MonitorState::Unknown),
            None => MonitorState::Unknown,
        }
    }
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Monitor identifier; the API may send either numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MonitorId {
    Number(i64),
    Text(String),
}

impl fmt::Display for MonitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorId::Number(n) => write!(f, "{}", n),
            MonitorId::Text(s) => f.write_str(s),
        }
    }
}

/// Monitor priority from a `priority:pN` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    P1,
    P2,
    #[default]
    P3,
    P4,
    P5,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
            Priority::P4 => "P4",
            Priority::P5 => "P5",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        let (key, value) = tag.split_once(':')?;
        if !key.eq_ignore_ascii_case("priority") {
            return None;
        }
        match value.to_ascii_lowercase().as_str() {
            "p1" => Some(Priority::P1),
            "p2" => Some(Priority::P2),
            "p3" => Some(Priority::P3),
            "p4" => Some(Priority::P4),
            "p5" => Some(Priority::P5),
            _ => None,
        }
    }
}

/// A monitor as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Monitor {
    pub id: MonitorId,
    pub name: String,
    #[serde(rename = "overall_state")]
    pub state: MonitorState,
    pub tags: Vec<String>,
    #[serde(rename = "overall_url")]
    pub url: String,
}

impl Monitor {
    /// Service group key: the text after the colon of the first `service:` tag.
    pub fn service(&self) -> &str {
        self.tags
            .iter()
            .filter_map(|tag| tag.split_once(':'))
            .find(|(key, _)| *key == SERVICE_TAG)
            .map(|(_, value)| value)
            .unwrap_or(NO_SERVICE)
    }

    /// Priority from the first valid `priority:pN` tag, P3 when absent.
    pub fn priority(&self) -> Priority {
        self.tags.iter().find_map(|tag| Priority::from_tag(tag)).unwrap_or_default()
    }

    /// Case-insensitive check for any of the given tags.
    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        self.tags
            .iter()
            .any(|own| tags.iter().any(|wanted| own.eq_ignore_ascii_case(wanted)))
    }
}
