//! Channel messaging and context reads.

use super::{ContextView, OrchestrationEngine};
use chrono::{DateTime, Utc};
use squad_domain::{EngineError, Message, MessageId, SenderKind, SquadId};

impl OrchestrationEngine {
    /// Posts a message to the squad channel. The sender must be an active
    /// member; engine-authored sender kinds are reserved.
    pub fn send_message(
        &self,
        squad_id: &SquadId,
        sender_name: &str,
        sender_kind: SenderKind,
        content: &str,
        reply_to: Option<MessageId>,
    ) -> Result<Message, EngineError> {
        if !matches!(sender_kind, SenderKind::Human | SenderKind::Agent) {
            return Err(EngineError::InvalidArgument(
                "sender kind must be 'human' or 'agent'".into(),
            ));
        }
        if content.trim().is_empty() {
            return Err(EngineError::InvalidArgument(
                "message content must not be empty".into(),
            ));
        }

        let (message, events) = self.store.with_squad(squad_id, |state| {
            let sender = state
                .find_active_by_name(sender_name)
                .ok_or_else(|| EngineError::NotAMember(sender_name.to_string()))?;

            let mut message = Message::new(
                sender.id.as_str(),
                sender.name.clone(),
                sender_kind,
                content,
            );
            if let Some(reply_to) = reply_to {
                message = message.with_reply_to(reply_to);
            }
            let message = state.push_message(message);
            let event = Self::message_event(squad_id, &message);
            Ok((message, vec![event]))
        })?;
        self.publish_all(events);

        Ok(message)
    }

    /// Reads channel messages in chronological order, optionally only
    /// those after `since`, capped at `limit` most recent.
    pub fn read_messages(
        &self,
        squad_id: &SquadId,
        since: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> Result<Vec<Message>, EngineError> {
        self.store.with_squad(squad_id, |state| {
            let mut messages: Vec<Message> = state
                .messages
                .iter()
                .filter(|m| since.map_or(true, |since| m.timestamp > since))
                .cloned()
                .collect();
            if let Some(limit) = limit {
                if messages.len() > limit {
                    messages.drain(..messages.len() - limit);
                }
            }
            Ok(messages)
        })
    }

    /// The squad's canonical context: every ratified entry in ascending
    /// version order, plus a rendered summary.
    pub fn get_context(&self, squad_id: &SquadId) -> Result<ContextView, EngineError> {
        self.store.with_squad(squad_id, |state| {
            let summary = state
                .entries
                .iter()
                .map(|e| e.summary_line())
                .collect::<Vec<_>>()
                .join("\n");
            Ok(ContextView {
                squad_id: squad_id.clone(),
                version: state.current_version(),
                entries: state.entries.clone(),
                summary,
            })
        })
    }
}
