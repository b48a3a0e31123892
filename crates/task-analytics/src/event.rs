//! Usage event record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use task_config::Theme;

/// Open key/value attributes attached to an event
pub type Metadata = serde_json::Map<String, Value>;

pub const THEME_CHANGED: &str = "theme_changed";
pub const TASK_CREATED: &str = "task_created";
pub const TASK_COMPLETED: &str = "task_completed";
pub const TASK_DELETED: &str = "task_deleted";
pub const FILTER_APPLIED: &str = "filter_applied";

/// One recorded user action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub event_name: String,
    pub timestamp: DateTime<Utc>,
    /// Theme active when the event was recorded
    #[serde(default, deserialize_with = "lenient_theme")]
    pub theme: Theme,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_metadata"
    )]
    pub metadata: Option<Metadata>,
}

impl Event {
    pub fn new(event_name: impl Into<String>, theme: Theme, metadata: Option<Metadata>) -> Self {
        Self {
            event_name: event_name.into(),
            timestamp: Utc::now(),
            theme,
            metadata,
        }
    }

    /// String value of a metadata attribute
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.as_ref()?.get(key)?.as_str()
    }
}

/// Unknown or malformed themes load as the default theme
fn lenient_theme<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Theme, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or_default())
}

/// Metadata that is not an object loads as absent
fn lenient_metadata<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Metadata>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(map)) => Ok(Some(map)),
        _ => Ok(None),
    }
}

/// Single-attribute metadata
pub(crate) fn single(key: &str, value: &str) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert(key.to_string(), Value::String(value.to_string()));
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_serializes_camel_case() {
        let event = Event {
            event_name: THEME_CHANGED.to_string(),
            timestamp: "2024-03-01T08:00:00Z".parse().unwrap(),
            theme: Theme::Dark,
            metadata: Some(single("newTheme", "dark")),
        };

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "eventName": "theme_changed",
                "timestamp": "2024-03-01T08:00:00Z",
                "theme": "dark",
                "metadata": {"newTheme": "dark"}
            })
        );
    }

    #[test]
    fn test_missing_metadata_is_omitted() {
        let event = Event::new(TASK_CREATED, Theme::Light, None);
        let value = serde_json::to_value(&event).unwrap();
        assert!(value.get("metadata").is_none());
    }

    #[test]
    fn test_accepts_arbitrary_metadata() {
        let event: Event = serde_json::from_value(json!({
            "eventName": "custom",
            "timestamp": "2024-03-01T08:00:00.123Z",
            "theme": "light",
            "metadata": {"count": 3, "nested": {"a": [1, 2]}}
        }))
        .unwrap();

        assert_eq!(event.event_name, "custom");
        assert_eq!(event.metadata_str("count"), None);
        assert_eq!(event.metadata.unwrap()["count"], json!(3));
    }

    #[test]
    fn test_unknown_theme_and_bad_metadata_load_leniently() {
        let event: Event = serde_json::from_value(json!({
            "eventName": "task_created",
            "timestamp": "2024-03-01T08:00:00Z",
            "theme": "system",
            "metadata": "oops"
        }))
        .unwrap();

        assert_eq!(event.theme, Theme::Light);
        assert_eq!(event.metadata, None);

        let event: Event = serde_json::from_value(json!({
            "eventName": "task_created",
            "timestamp": "2024-03-01T08:00:00Z",
            "theme": null
        }))
        .unwrap();
        assert_eq!(event.theme, Theme::Light);
    }
}
