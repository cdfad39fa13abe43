//! Engine events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use squad_domain::SquadId;

/// Every state change the engine makes is announced as one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    MemberJoined,
    MemberLeft,
    NewMessage,
    CommitProposed,
    VoteCast,
    CommitResolved,
    ContextUpdated,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::MemberJoined => write!(f, "member_joined"),
            EventKind::MemberLeft => write!(f, "member_left"),
            EventKind::NewMessage => write!(f, "new_message"),
            EventKind::CommitProposed => write!(f, "commit_proposed"),
            EventKind::VoteCast => write!(f, "vote_cast"),
            EventKind::CommitResolved => write!(f, "commit_resolved"),
            EventKind::ContextUpdated => write!(f, "context_updated"),
        }
    }
}

/// A state-change notification fanned out to subscribers.
///
/// Delivery is synchronous and best-effort; nothing is persisted and
/// nothing is retried. Durable delivery (webhooks, push channels) is a
/// downstream collaborator's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub squad_id: SquadId,
    pub timestamp: DateTime<Utc>,
    pub data: serde_json::Value,
}

impl EngineEvent {
    /// Creates an event stamped with the current time. `data` is the
    /// serialized entity the event is about; serialization failures fall
    /// back to null rather than blocking the mutation that produced the
    /// event.
    pub fn new<T: Serialize>(kind: EventKind, squad_id: SquadId, data: &T) -> Self {
        Self {
            kind,
            squad_id,
            timestamp: Utc::now(),
            data: serde_json::to_value(data).unwrap_or(serde_json::Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_shape() {
        let event = EngineEvent::new(
            EventKind::MemberJoined,
            SquadId::new("s1"),
            &serde_json::json!({"name": "Ava"}),
        );
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "member_joined");
        assert_eq!(value["squad_id"], "s1");
        assert_eq!(value["data"]["name"], "Ava");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_kind_display_matches_wire_name() {
        assert_eq!(EventKind::CommitResolved.to_string(), "commit_resolved");
        assert_eq!(
            serde_json::to_string(&EventKind::CommitResolved).unwrap(),
            "\"commit_resolved\""
        );
    }
}
