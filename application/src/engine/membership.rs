//! Membership operations: join, leave, list, kick.

use super::{JoinOutcome, OrchestrationEngine};
use crate::events::{EngineEvent, EventKind};
use crate::ports::audit_sink::audit_events;
use crate::ports::auth_gate::AuthIdentity;
use squad_domain::{EngineError, Member, MemberId, Message, SquadId};
use tracing::info;

impl OrchestrationEngine {
    /// Enrolls a member pair. The display name must be unused among
    /// *active* members; a member who left can rejoin under the same name
    /// and receives a fresh id.
    pub fn join(
        &self,
        squad_id: &SquadId,
        name: &str,
        model: &str,
    ) -> Result<JoinOutcome, EngineError> {
        if name.trim().is_empty() {
            return Err(EngineError::InvalidArgument(
                "member name must not be empty".into(),
            ));
        }

        let (outcome, events) = self.store.with_squad(squad_id, |state| {
            if state.find_active_by_name(name).is_some() {
                return Err(EngineError::NameTaken(name.to_string()));
            }

            let member = Member::new(name, model);
            state.members.push(member.clone());
            let announcement =
                state.push_message(Message::system(format!("{name} joined the squad")));

            let events = vec![
                EngineEvent::new(EventKind::MemberJoined, squad_id.clone(), &member),
                Self::message_event(squad_id, &announcement),
            ];
            Ok((
                JoinOutcome {
                    member,
                    announcement,
                },
                events,
            ))
        })?;
        self.publish_all(events);

        info!(squad_id = %squad_id, member_id = %outcome.member.id, name, "member joined");
        Ok(outcome)
    }

    /// Deactivates the named member. Their messages, votes, and ledger
    /// provenance stay behind untouched.
    pub fn leave(&self, squad_id: &SquadId, name: &str) -> Result<Member, EngineError> {
        let (member, events) = self.store.with_squad(squad_id, |state| {
            let member = state
                .find_active_by_name_mut(name)
                .ok_or_else(|| EngineError::NotAMember(name.to_string()))?;
            member.is_active = false;
            let member = member.clone();

            let announcement =
                state.push_message(Message::system(format!("{name} left the squad")));
            let events = vec![
                EngineEvent::new(EventKind::MemberLeft, squad_id.clone(), &member),
                Self::message_event(squad_id, &announcement),
            ];
            Ok((member, events))
        })?;
        self.publish_all(events);

        info!(squad_id = %squad_id, member_id = %member.id, name, "member left");
        Ok(member)
    }

    /// Active members, in join order.
    pub fn list_members(&self, squad_id: &SquadId) -> Result<Vec<Member>, EngineError> {
        self.store.with_squad(squad_id, |state| {
            Ok(state.active_members().cloned().collect())
        })
    }

    /// Removes a member by force. Admin only.
    ///
    /// External credentials are revoked *before* deactivation; when
    /// revocation fails the member stays active and the error is
    /// returned, so a kicked-looking member can never still authenticate.
    pub async fn kick_member(
        &self,
        squad_id: &SquadId,
        identity: &AuthIdentity,
        member_id: &MemberId,
    ) -> Result<Member, EngineError> {
        self.require_admin(squad_id, identity)?;

        let name = self.store.with_squad(squad_id, |state| {
            let member = state
                .member_by_id(member_id)
                .filter(|m| m.is_active)
                .ok_or_else(|| EngineError::MemberNotFound(member_id.clone()))?;
            Ok(member.name.clone())
        })?;

        self.credentials
            .revoke_all(squad_id, member_id)
            .await
            .map_err(|err| EngineError::RevocationFailed(err.to_string()))?;

        let (member, events) = self.store.with_squad(squad_id, |state| {
            let member = state
                .members
                .iter_mut()
                .find(|m| &m.id == member_id && m.is_active)
                .ok_or_else(|| EngineError::MemberNotFound(member_id.clone()))?;
            member.is_active = false;
            let member = member.clone();

            let announcement = state.push_message(Message::system(format!(
                "{name} was removed from the squad"
            )));
            let events = vec![
                EngineEvent::new(EventKind::MemberLeft, squad_id.clone(), &member),
                Self::message_event(squad_id, &announcement),
            ];
            Ok((member, events))
        })?;
        self.publish_all(events);

        info!(squad_id = %squad_id, member_id = %member_id, "member kicked");
        self.record_audit(
            audit_events::MEMBER_KICKED,
            squad_id,
            Some(member_id),
            serde_json::json!({ "name": member.name, "kicked_by": identity.member_id }),
        )
        .await;

        Ok(member)
    }
}
