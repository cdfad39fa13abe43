//! Audit sink backed by the tracing pipeline.
//!
//! Writes each security-relevant action as a structured log record under
//! the `audit` target, so operators can route it to a separate appender
//! with an `EnvFilter` directive like `audit=info`.

use async_trait::async_trait;
use squad_application::{AuditError, AuditSink};
use squad_domain::{MemberId, SquadId};
use tracing::info;

/// [`AuditSink`] that emits audit records as structured log events.
#[derive(Default)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(
        &self,
        event_type: &str,
        squad_id: &SquadId,
        member_id: Option<&MemberId>,
        details: serde_json::Value,
    ) -> Result<(), AuditError> {
        info!(
            target: "audit",
            event_type,
            squad_id = %squad_id,
            member_id = member_id.map(|m| m.to_string()),
            details = %details,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_record_never_fails() {
        let sink = TracingAuditSink::new();
        sink.record(
            "member_kicked",
            &SquadId::new("s1"),
            Some(&MemberId::new("m1")),
            serde_json::json!({ "name": "Ben" }),
        )
        .await
        .unwrap();
    }
}
