use std::cmp::Ordering;

use backoffice_model::{EntityKind, LifecycleEvent, StatusCode};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::tables::lifecycle_table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum StepState {
    Done,
    Current,
    Pending,
}

impl StepState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::Current => "current",
            Self::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineStep {
    pub status_code: &'static str,
    pub event_at: Option<String>,
    pub actor_name: Option<String>,
    pub note: Option<String>,
    pub state: StepState,
}

/// Rebuilds the status timeline of one entity.
///
/// Produces one step per status in the kind's canonical order. A step is
/// `done` only when it precedes the current status and an event for it
/// exists; an unknown current status leaves every step `pending`.
#[must_use]
pub fn build_lifecycle_timeline_steps(
    kind: EntityKind,
    current_status: &str,
    events: &[LifecycleEvent],
) -> Vec<TimelineStep> {
    let Some(table) = lifecycle_table(kind) else {
        return Vec::new();
    };
    let current = StatusCode::normalize(current_status);
    let current_index = table.status_index(current.as_str());

    table
        .statuses
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            let latest = latest_event_for(events, spec.code);
            let state = match current_index {
                Some(c) if c == index => StepState::Current,
                Some(c) if index < c && latest.is_some() => StepState::Done,
                _ => StepState::Pending,
            };
            TimelineStep {
                status_code: spec.code,
                event_at: latest
                    .map(|e| e.at.trim())
                    .filter(|at| !at.is_empty())
                    .map(ToString::to_string),
                actor_name: latest.and_then(|e| e.actor_name.clone()),
                note: latest.and_then(|e| e.note.clone()),
                state,
            }
        })
        .collect()
}

fn latest_event_for<'a>(events: &'a [LifecycleEvent], code: &str) -> Option<&'a LifecycleEvent> {
    events
        .iter()
        .filter(|event| !event.status_code.is_blank() && event.status_code == code)
        .max_by(|a, b| recency(a, b))
}

fn event_instant(at: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(at.trim())
        .ok()
        .map(|instant| instant.with_timezone(&Utc))
}

// RFC 3339 instants outrank unparseable `at` values, which fall back to text
// order. `max_by` keeps the last of equal elements, so ties go to the later event.
fn recency(a: &LifecycleEvent, b: &LifecycleEvent) -> Ordering {
    match (event_instant(&a.at), event_instant(&b.at)) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.at.trim().cmp(b.at.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_event_prefers_greatest_timestamp_then_input_order() {
        let events = vec![
            LifecycleEvent::new("ACTIVE", "2026-02-01T00:00:00Z").with_actor("first"),
            LifecycleEvent::new("ACTIVE", "2026-03-01T00:00:00Z").with_actor("second"),
            LifecycleEvent::new("ACTIVE", "2026-01-01T00:00:00Z").with_actor("older"),
            LifecycleEvent::new("ACTIVE", "2026-03-01T00:00:00Z").with_actor("tie"),
        ];
        let latest = latest_event_for(&events, "ACTIVE").expect("active event");
        assert_eq!(latest.actor_name.as_deref(), Some("tie"));
    }

    #[test]
    fn parseable_instants_outrank_free_text() {
        let events = vec![
            LifecycleEvent::new("POSTED", "2026-03-01T10:00:00Z").with_actor("dated"),
            LifecycleEvent::new("POSTED", "yesterday").with_actor("free text"),
            LifecycleEvent::new("POSTED", "").with_actor("blank"),
        ];
        let latest = latest_event_for(&events, "POSTED").expect("posted event");
        assert_eq!(latest.actor_name.as_deref(), Some("dated"));
    }

    #[test]
    fn blank_timestamps_are_reported_as_missing() {
        let events = vec![LifecycleEvent::new("OPEN", "  ").with_actor("cashier")];
        let steps = build_lifecycle_timeline_steps(EntityKind::CashSession, "CLOSED", &events);
        assert_eq!(steps[0].state, StepState::Done);
        assert_eq!(steps[0].event_at, None);
        assert_eq!(steps[0].actor_name.as_deref(), Some("cashier"));
    }
}
