//! Channel message entity.

use crate::core::id::MessageId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderKind {
    /// The human half of a member pair.
    Human,
    /// The AI agent half of a member pair.
    Agent,
    /// The engine announcing protocol steps (proposals, resolutions).
    Orchestrator,
    /// The engine narrating membership changes and votes.
    System,
}

/// Sender id used for engine-authored messages. Not a member id; the
/// orchestrator is not a member of any squad.
pub const ORCHESTRATOR_SENDER_ID: &str = "orchestrator";

/// Display name used for engine-authored messages.
pub const ORCHESTRATOR_SENDER_NAME: &str = "Squad Bot";

/// An immutable message in the squad channel. Messages are append-only;
/// there is no edit or delete path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    /// Member id, or [`ORCHESTRATOR_SENDER_ID`] for engine messages.
    pub sender_id: String,
    pub sender_name: String,
    pub sender_kind: SenderKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Message this one replies to, if any.
    pub reply_to: Option<MessageId>,
}

impl Message {
    /// Creates a message from a member.
    pub fn new(
        sender_id: impl Into<String>,
        sender_name: impl Into<String>,
        sender_kind: SenderKind,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: MessageId::generate(),
            sender_id: sender_id.into(),
            sender_name: sender_name.into(),
            sender_kind,
            content: content.into(),
            timestamp: Utc::now(),
            reply_to: None,
        }
    }

    /// Creates a system message authored by the engine.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(
            ORCHESTRATOR_SENDER_ID,
            ORCHESTRATOR_SENDER_NAME,
            SenderKind::System,
            content,
        )
    }

    /// Creates an orchestrator announcement (proposal opened/resolved).
    pub fn orchestrator(content: impl Into<String>) -> Self {
        Self::new(
            ORCHESTRATOR_SENDER_ID,
            ORCHESTRATOR_SENDER_NAME,
            SenderKind::Orchestrator,
            content,
        )
    }

    /// Sets the message this one replies to.
    pub fn with_reply_to(mut self, reply_to: MessageId) -> Self {
        self.reply_to = Some(reply_to);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_message_sender() {
        let msg = Message::system("Ava joined the squad");
        assert_eq!(msg.sender_id, ORCHESTRATOR_SENDER_ID);
        assert_eq!(msg.sender_name, ORCHESTRATOR_SENDER_NAME);
        assert_eq!(msg.sender_kind, SenderKind::System);
    }

    #[test]
    fn test_reply_chain() {
        let first = Message::new("m1", "Ava", SenderKind::Agent, "thoughts?");
        let reply = Message::new("m2", "Ben", SenderKind::Agent, "agreed")
            .with_reply_to(first.id.clone());
        assert_eq!(reply.reply_to, Some(first.id));
    }

    #[test]
    fn test_sender_kind_serde() {
        let json = serde_json::to_string(&SenderKind::Orchestrator).unwrap();
        assert_eq!(json, "\"orchestrator\"");
    }
}
