//! Lenient decoding of monitor list payloads.

use serde::Deserialize;
use serde_json::Value;

use crate::data::{Monitor, MonitorId, MonitorState};

/// One monitor as it appears on the wire; everything except `id` is optional.
#[derive(Debug, Deserialize)]
struct WireMonitor {
    id: MonitorId,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    overall_state: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    overall_url: Option<String>,
}

impl From<WireMonitor> for Monitor {
    fn from(wire: WireMonitor) -> Self {
        Monitor {
            id: wire.id,
            name: wire.name.unwrap_or_default(),
            state: MonitorState::from_api(wire.overall_state.as_deref()),
            tags: wire.tags.unwrap_or_default(),
            url: wire.overall_url.unwrap_or_default(),
        }
    }
}

/// Decode a monitor list body.
///
/// Accepts `{"monitors": [...]}` or a bare array. Anything else, including
/// invalid JSON, yields an empty list. Items that are not monitors are
/// skipped.
pub fn decode_monitors(body: &[u8]) -> Vec<Monitor> {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            if body.iter().any(|b| !b.is_ascii_whitespace()) {
                tracing::warn!("malformed monitor payload: {}", e);
            }
            return Vec::new();
        }
    };

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("monitors") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                tracing::warn!("`monitors` is not a list: {}", kind(&other));
                Vec::new()
            }
            None => Vec::new(),
        },
        other => {
            tracing::warn!("unexpected monitor payload: {}", kind(&other));
            Vec::new()
        }
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<WireMonitor>(item) {
            Ok(wire) => Some(Monitor::from(wire)),
            Err(e) => {
                tracing::warn!("skipping unreadable monitor: {}", e);
                None
            }
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_with_monitors() {
        let body = br#"{"monitors":[
            {"id":1,"name":"db latency","overall_state":"Alert","tags":["service:db"],
             "overall_url":"https://app.datadoghq.com/monitors/1"}
        ]}"#;
        let monitors = decode_monitors(body);
        assert_eq!(monitors.len(), 1);
        assert_eq!(monitors[0].id, MonitorId::Number(1));
        assert_eq!(monitors[0].state, MonitorState::Alert);
        assert_eq!(monitors[0].service(), "db");
        assert_eq!(monitors[0].url, "https://app.datadoghq.com/monitors/1");
    }

    #[test]
    fn test_bare_array() {
        let body = br#"[{"id":"abc","name":"x","overall_state":"OK"}]"#;
        let monitors = decode_monitors(body);
        assert_eq!(monitors.len(), 1);
        assert_eq!(monitors[0].id, MonitorId::Text("abc".into()));
        assert_eq!(monitors[0].state, MonitorState::Ok);
    }

    #[test]
    fn test_missing_fields_default() {
        let monitors = decode_monitors(br#"{"monitors":[{"id":7,"name":"bare","tags":null}]}"#);
        assert_eq!(monitors[0].state, MonitorState::Unknown);
        assert!(monitors[0].tags.is_empty());
        assert!(monitors[0].url.is_empty());
    }

    #[test]
    fn test_malformed_bodies_are_empty() {
        assert!(decode_monitors(b"").is_empty());
        assert!(decode_monitors(b"<html>oops</html>").is_empty());
        assert!(decode_monitors(br#"{"ok":true}"#).is_empty());
        assert!(decode_monitors(br#"{"monitors":"nope"}"#).is_empty());
        assert!(decode_monitors(b"42").is_empty());
    }

    #[test]
    fn test_unreadable_items_are_skipped() {
        let body = br#"[{"id":1,"name":"ok"},{"name":"no id"},"junk",{"id":2}]"#;
        let ids: Vec<String> = decode_monitors(body).iter().map(|m| m.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
