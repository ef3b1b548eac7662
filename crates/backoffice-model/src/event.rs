use crate::status::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One status change as reported by the REST collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleEvent {
    pub status_code: StatusCode,
    #[serde(default)]
    pub at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl LifecycleEvent {
    #[must_use]
    pub fn new(status_code: &str, at: &str) -> Self {
        Self {
            status_code: StatusCode::normalize(status_code),
            at: at.trim().to_string(),
            actor_name: None,
            note: None,
        }
    }

    #[must_use]
    pub fn with_actor(mut self, actor_name: &str) -> Self {
        self.actor_name = Some(actor_name.to_string());
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }
}

/// Decodes an event history, skipping entries that are not objects or carry no
/// usable `statusCode`.
#[must_use]
pub fn events_from_json_value(value: &Value) -> Vec<LifecycleEvent> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let status = obj.get("statusCode").and_then(Value::as_str)?;
            let at = obj.get("at").and_then(Value::as_str).unwrap_or_default();
            let mut event = LifecycleEvent::new(status, at);
            event.actor_name = non_blank(obj.get("actorName"));
            event.note = non_blank(obj.get("note"));
            Some(event)
        })
        .filter(|event| !event.status_code.is_blank())
        .collect()
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
