//! The orchestration engine facade.
//!
//! One engine instance owns the squad store, the event hub, and the
//! outbound ports. Every operation is scoped to exactly one explicit
//! squad id; there is no default squad. Mutations follow a fixed shape:
//! take the squad lock, mutate, collect events, release the lock, then
//! publish. Listener callbacks therefore never run while squad state is
//! locked.

mod commits;
mod membership;
mod messaging;
mod responses;

pub use responses::{
    ContextView, JoinOutcome, PendingProposal, SquadCreated, SquadStatus, VoteOutcome,
};

use crate::events::{EngineEvent, EventHub};
use crate::ports::audit_sink::{audit_events, AuditSink};
use crate::ports::auth_gate::AuthIdentity;
use crate::ports::credential_store::CredentialStore;
use crate::store::SquadStore;
use squad_domain::{
    ConsensusMode, EngineError, Member, MemberId, MemberRole, Message, Squad, SquadId,
    SquadSettingsUpdate,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Defaults applied to squads created without explicit settings.
#[derive(Debug, Clone)]
pub struct EngineDefaults {
    pub consensus_mode: ConsensusMode,
    pub commit_timeout_seconds: u64,
}

impl Default for EngineDefaults {
    fn default() -> Self {
        Self {
            consensus_mode: ConsensusMode::Majority,
            commit_timeout_seconds: 300,
        }
    }
}

/// Coordinates squads, messages, proposals, and consensus.
pub struct OrchestrationEngine {
    store: SquadStore,
    hub: EventHub,
    credentials: Arc<dyn CredentialStore>,
    audit: Arc<dyn AuditSink>,
    defaults: EngineDefaults,
}

impl OrchestrationEngine {
    pub fn new(credentials: Arc<dyn CredentialStore>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            store: SquadStore::new(),
            hub: EventHub::new(),
            credentials,
            audit,
            defaults: EngineDefaults::default(),
        }
    }

    /// Overrides the defaults applied to new squads.
    pub fn with_defaults(mut self, defaults: EngineDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// The hub this engine publishes to. Subscribe here for events.
    pub fn hub(&self) -> &EventHub {
        &self.hub
    }

    // ── Squad lifecycle ──────────────────────────────────────────────

    /// Creates a squad with the engine defaults and enrolls `creator_name`
    /// as its first member, with the admin role.
    pub async fn create_squad(
        &self,
        name: &str,
        creator_name: &str,
        creator_model: &str,
    ) -> Result<SquadCreated, EngineError> {
        if name.trim().is_empty() {
            return Err(EngineError::InvalidArgument(
                "squad name must not be empty".into(),
            ));
        }
        if creator_name.trim().is_empty() {
            return Err(EngineError::InvalidArgument(
                "member name must not be empty".into(),
            ));
        }

        let creator = Member::new(creator_name, creator_model).with_role(MemberRole::Admin);
        let squad = Squad::new(
            name,
            self.defaults.consensus_mode,
            self.defaults.commit_timeout_seconds,
            creator.id.clone(),
        );
        let created = SquadCreated {
            squad: squad.clone(),
            creator: creator.clone(),
        };

        let squad_id = self.store.insert(squad)?;
        self.store.with_squad(&squad_id, |state| {
            state.members.push(creator);
            state.push_message(Message::system(format!(
                "Squad '{name}' created by {creator_name}"
            )));
            Ok(())
        })?;

        info!(squad_id = %squad_id, name, "squad created");
        self.record_audit(
            audit_events::SQUAD_CREATED,
            &squad_id,
            Some(&created.creator.id),
            serde_json::json!({ "name": name }),
        )
        .await;

        Ok(created)
    }

    /// Applies a partial settings update. Admin only. Proposals already
    /// open keep the mode and timeout they captured at creation.
    pub async fn update_squad_settings(
        &self,
        squad_id: &SquadId,
        identity: &AuthIdentity,
        update: SquadSettingsUpdate,
    ) -> Result<Vec<&'static str>, EngineError> {
        self.require_admin(squad_id, identity)?;

        let (changed, events) = self.store.with_squad(squad_id, |state| {
            let changed = update.apply(&mut state.squad)?;
            let message = state.push_message(Message::system(format!(
                "Squad settings updated: {}",
                changed.join(", ")
            )));
            Ok((changed, vec![Self::message_event(squad_id, &message)]))
        })?;
        self.publish_all(events);

        info!(squad_id = %squad_id, fields = ?changed, "squad settings updated");
        self.record_audit(
            audit_events::SETTINGS_CHANGED,
            squad_id,
            Some(&identity.member_id),
            serde_json::json!({ "fields": changed }),
        )
        .await;

        Ok(changed)
    }

    /// Snapshot of one squad.
    pub fn get_status(&self, squad_id: &SquadId) -> Result<SquadStatus, EngineError> {
        self.store.with_squad(squad_id, |state| {
            Ok(SquadStatus {
                squad_id: state.squad.id.clone(),
                name: state.squad.name.clone(),
                consensus_mode: state.squad.consensus_mode,
                active_members: state.active_members().map(|m| m.name.clone()).collect(),
                message_count: state.messages.len(),
                context_version: state.current_version(),
                pending_proposals: state
                    .proposals
                    .iter()
                    .filter(|p| !p.status.is_terminal())
                    .count(),
                created_at: state.squad.created_at,
            })
        })
    }

    // ── Internal helpers ─────────────────────────────────────────────

    fn require_admin(
        &self,
        squad_id: &SquadId,
        identity: &AuthIdentity,
    ) -> Result<(), EngineError> {
        if &identity.squad_id != squad_id || !identity.is_admin() {
            return Err(EngineError::AdminRequired);
        }
        Ok(())
    }

    fn publish_all(&self, events: Vec<EngineEvent>) {
        for event in events {
            self.hub.publish(&event);
        }
    }

    fn message_event(squad_id: &SquadId, message: &Message) -> EngineEvent {
        EngineEvent::new(
            crate::events::EventKind::NewMessage,
            squad_id.clone(),
            message,
        )
    }

    /// Best-effort audit write; failures are logged, never surfaced.
    async fn record_audit(
        &self,
        event_type: &str,
        squad_id: &SquadId,
        member_id: Option<&MemberId>,
        details: serde_json::Value,
    ) {
        if let Err(err) = self
            .audit
            .record(event_type, squad_id, member_id, details)
            .await
        {
            warn!(event_type, squad_id = %squad_id, %err, "audit record failed");
        }
    }
}
