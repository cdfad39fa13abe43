//! Audit sink port.
//!
//! Security-relevant actions (kicks, settings changes, squad creation)
//! are recorded alongside the event publish. Recording is best-effort:
//! the engine logs and swallows sink failures rather than failing the
//! operation that triggered them.

use async_trait::async_trait;
use squad_domain::{MemberId, SquadId};
use thiserror::Error;

/// Audit event types the engine records.
pub mod audit_events {
    pub const SQUAD_CREATED: &str = "squad_created";
    pub const SETTINGS_CHANGED: &str = "settings_changed";
    pub const MEMBER_KICKED: &str = "member_kicked";
}

/// Failure writing an audit record.
#[derive(Error, Debug)]
#[error("audit sink failure: {0}")]
pub struct AuditError(pub String);

/// Durable security log, persisted by an external collaborator.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(
        &self,
        event_type: &str,
        squad_id: &SquadId,
        member_id: Option<&MemberId>,
        details: serde_json::Value,
    ) -> Result<(), AuditError>;
}
