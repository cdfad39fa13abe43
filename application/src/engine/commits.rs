//! Commit proposals, voting, and resolution.
//!
//! Resolution happens eagerly: every vote re-runs the evaluator under
//! the squad lock and applies the verdict in the same critical section,
//! so a proposal resolves exactly once and the ledger version it commits
//! is assigned atomically with the resolution.

use super::{OrchestrationEngine, PendingProposal, VoteOutcome};
use crate::events::{EngineEvent, EventKind};
use crate::store::SquadState;
use chrono::Utc;
use squad_domain::{
    evaluate, CommitProposal, ConsensusOutcome, ContextEntry, EngineError, Message, ProposalId,
    ProposalOrigin, ProposalStatus, SquadId, Vote, VoteChoice, ORCHESTRATOR_SENDER_ID,
    ORCHESTRATOR_SENDER_NAME,
};
use tracing::{info, warn};

impl OrchestrationEngine {
    /// Opens a commit proposal nominated by a member. The squad's current
    /// consensus mode and timeout are captured into the proposal and are
    /// immune to later settings changes.
    pub fn propose_commit(
        &self,
        squad_id: &SquadId,
        proposer_name: &str,
        content: &str,
    ) -> Result<CommitProposal, EngineError> {
        self.open_proposal(squad_id, Some(proposer_name), content)
    }

    /// Opens a proposal on the orchestrator's own initiative, when it
    /// detects the conversation has converged on a decision.
    pub fn propose_detected_commit(
        &self,
        squad_id: &SquadId,
        content: &str,
    ) -> Result<CommitProposal, EngineError> {
        self.open_proposal(squad_id, None, content)
    }

    fn open_proposal(
        &self,
        squad_id: &SquadId,
        proposer_name: Option<&str>,
        content: &str,
    ) -> Result<CommitProposal, EngineError> {
        if content.trim().is_empty() {
            return Err(EngineError::InvalidArgument(
                "proposal content must not be empty".into(),
            ));
        }

        let (proposal, events) = self.store.with_squad(squad_id, |state| {
            let (proposed_by, proposed_by_name, origin) = match proposer_name {
                Some(name) => {
                    let member = state
                        .find_active_by_name(name)
                        .ok_or_else(|| EngineError::NotAMember(name.to_string()))?;
                    (
                        member.id.to_string(),
                        member.name.clone(),
                        ProposalOrigin::MemberNominated,
                    )
                }
                None => (
                    ORCHESTRATOR_SENDER_ID.to_string(),
                    ORCHESTRATOR_SENDER_NAME.to_string(),
                    ProposalOrigin::OrchestratorDetected,
                ),
            };

            let proposal = CommitProposal::new(
                content,
                proposed_by,
                proposed_by_name.clone(),
                origin,
                state.squad.consensus_mode,
                state.squad.commit_timeout_seconds,
            );
            state.proposals.push(proposal.clone());

            let announcement = state.push_message(Message::orchestrator(format!(
                "Commit proposal {} from {}: \"{}\". Vote approve, reject, or abstain ({})",
                proposal.id, proposed_by_name, content, proposal.consensus_mode,
            )));
            let events = vec![
                EngineEvent::new(EventKind::CommitProposed, squad_id.clone(), &proposal),
                Self::message_event(squad_id, &announcement),
            ];
            Ok((proposal, events))
        })?;
        self.publish_all(events);

        info!(
            squad_id = %squad_id,
            proposal_id = %proposal.id,
            origin = %proposal.origin,
            "commit proposed"
        );
        Ok(proposal)
    }

    /// Casts a vote. Voting again on the same proposal overwrites the
    /// earlier choice. After recording, the evaluator runs against the
    /// live active-member count; a verdict resolves the proposal in the
    /// same critical section.
    pub fn vote(
        &self,
        squad_id: &SquadId,
        voter_name: &str,
        proposal_id: &ProposalId,
        choice: VoteChoice,
        human_override: bool,
    ) -> Result<VoteOutcome, EngineError> {
        let (outcome, events) = self.store.with_squad(squad_id, |state| {
            let voter = state
                .find_active_by_name(voter_name)
                .ok_or_else(|| EngineError::NotAMember(voter_name.to_string()))?;
            let voter_id = voter.id.clone();

            let proposal = state
                .proposal(proposal_id)
                .ok_or_else(|| EngineError::ProposalNotFound(proposal_id.clone()))?;
            if proposal.status.is_terminal() {
                return Err(EngineError::ProposalAlreadyResolved {
                    id: proposal_id.clone(),
                    status: proposal.status.to_string(),
                });
            }
            let mode = proposal.consensus_mode;

            let vote = Vote::new(
                proposal_id.clone(),
                voter_id,
                voter_name,
                choice,
                human_override,
            );
            state.record_vote(vote.clone());

            let override_note = if human_override { " (human override)" } else { "" };
            let announcement = state.push_message(Message::system(format!(
                "{voter_name} voted {choice} on {proposal_id}{override_note}"
            )));
            let mut events = vec![
                EngineEvent::new(EventKind::VoteCast, squad_id.clone(), &vote),
                Self::message_event(squad_id, &announcement),
            ];

            let decision = evaluate(
                mode,
                state.votes_for(proposal_id),
                state.active_member_count(),
            );
            let (status, committed_entry) = match decision.outcome {
                ConsensusOutcome::Pending => (ProposalStatus::Pending, None),
                ConsensusOutcome::Approved => {
                    let entry = Self::resolve_locked(
                        squad_id,
                        state,
                        proposal_id,
                        ProposalStatus::Approved,
                        &decision.describe(),
                        &mut events,
                    )?;
                    (ProposalStatus::Approved, entry)
                }
                ConsensusOutcome::Rejected => {
                    Self::resolve_locked(
                        squad_id,
                        state,
                        proposal_id,
                        ProposalStatus::Rejected,
                        &decision.describe(),
                        &mut events,
                    )?;
                    (ProposalStatus::Rejected, None)
                }
            };

            Ok((
                VoteOutcome {
                    vote,
                    decision,
                    status,
                    committed_entry,
                },
                events,
            ))
        })?;
        self.publish_all(events);

        Ok(outcome)
    }

    /// Pending proposals with their live vote summaries.
    pub fn list_pending_commits(
        &self,
        squad_id: &SquadId,
    ) -> Result<Vec<PendingProposal>, EngineError> {
        self.store.with_squad(squad_id, |state| {
            let active = state.active_member_count();
            Ok(state
                .proposals
                .iter()
                .filter(|p| !p.status.is_terminal())
                .map(|p| {
                    let decision = evaluate(p.consensus_mode, state.votes_for(&p.id), active);
                    PendingProposal {
                        proposal: p.clone(),
                        progress: decision.describe(),
                        tally: decision.tally,
                    }
                })
                .collect())
        })
    }

    /// Expires every pending no-objection proposal whose captured timeout
    /// has elapsed. Returns the number expired. Driven by a recurring
    /// sweeper task; safe to call at any time.
    pub fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let mut expired = 0;

        for (squad_id, handle) in self.store.handles() {
            let mut events = Vec::new();
            {
                let mut state = match handle.lock() {
                    Ok(state) => state,
                    Err(_) => {
                        warn!(squad_id = %squad_id, "squad lock poisoned; skipping sweep");
                        continue;
                    }
                };
                let overdue: Vec<ProposalId> = state
                    .proposals
                    .iter()
                    .filter(|p| p.is_overdue(now))
                    .map(|p| p.id.clone())
                    .collect();
                for proposal_id in overdue {
                    match Self::resolve_locked(
                        &squad_id,
                        &mut state,
                        &proposal_id,
                        ProposalStatus::Expired,
                        "expired",
                        &mut events,
                    ) {
                        Ok(_) => {
                            expired += 1;
                            info!(squad_id = %squad_id, proposal_id = %proposal_id, "proposal expired");
                        }
                        Err(err) => {
                            warn!(squad_id = %squad_id, proposal_id = %proposal_id, %err, "sweep failed to expire proposal");
                        }
                    }
                }
            }
            self.publish_all(events);
        }

        expired
    }

    /// Applies a terminal verdict while the squad lock is held. An
    /// approval additionally commits the content to the ledger. Pushes
    /// the resolution announcement and collects the events to publish
    /// once the lock is released.
    fn resolve_locked(
        squad_id: &SquadId,
        state: &mut SquadState,
        proposal_id: &ProposalId,
        status: ProposalStatus,
        reason: &str,
        events: &mut Vec<EngineEvent>,
    ) -> Result<Option<ContextEntry>, EngineError> {
        let proposal = state
            .proposal_mut(proposal_id)
            .ok_or_else(|| EngineError::ProposalNotFound(proposal_id.clone()))?;
        proposal.resolve(status)?;
        let proposal = proposal.clone();

        events.push(EngineEvent::new(
            EventKind::CommitResolved,
            squad_id.clone(),
            &serde_json::json!({ "proposal": proposal, "resolution": reason }),
        ));

        let mut committed_entry = None;
        let text = match status {
            ProposalStatus::Approved => {
                let entry = state.append_entry(
                    proposal.content.clone(),
                    proposal.proposed_by_name.clone(),
                    proposal.origin,
                    proposal.id.clone(),
                );
                events.push(EngineEvent::new(
                    EventKind::ContextUpdated,
                    squad_id.clone(),
                    &entry,
                ));
                let text = format!(
                    "Commit {} approved: {}. Context is now v{}.",
                    proposal.id, reason, entry.version
                );
                committed_entry = Some(entry);
                text
            }
            ProposalStatus::Rejected => {
                format!("Commit {} rejected: {}.", proposal.id, reason)
            }
            ProposalStatus::Expired => {
                format!(
                    "Commit {} expired: the no-objection window closed without resolution.",
                    proposal.id
                )
            }
            // resolve() only accepts terminal statuses
            ProposalStatus::Pending => unreachable!("resolving to pending"),
        };

        let announcement = state.push_message(Message::orchestrator(text));
        events.push(Self::message_event(squad_id, &announcement));

        Ok(committed_entry)
    }
}
