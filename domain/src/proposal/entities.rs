//! Commit proposals and their state machine.

use crate::consensus::mode::ConsensusMode;
use crate::core::error::EngineError;
use crate::core::id::ProposalId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How a proposal came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalOrigin {
    /// A member said "I believe we've decided X".
    MemberNominated,
    /// The orchestrator detected convergence in the conversation.
    OrchestratorDetected,
}

impl std::fmt::Display for ProposalOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProposalOrigin::MemberNominated => write!(f, "member_nominated"),
            ProposalOrigin::OrchestratorDetected => write!(f, "orchestrator_detected"),
        }
    }
}

/// Lifecycle of a proposal. `Pending` is the only non-terminal state;
/// once resolved, a proposal never transitions again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Pending,
    Approved,
    Rejected,
    Expired,
}

impl ProposalStatus {
    /// True for every state except `Pending`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProposalStatus::Pending)
    }
}

impl std::fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProposalStatus::Pending => write!(f, "pending"),
            ProposalStatus::Approved => write!(f, "approved"),
            ProposalStatus::Rejected => write!(f, "rejected"),
            ProposalStatus::Expired => write!(f, "expired"),
        }
    }
}

/// A candidate addition to the canonical context, awaiting votes.
///
/// The consensus mode and timeout are captured from the squad's settings
/// when the proposal is created; changing the squad's settings later does
/// not affect proposals already open.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitProposal {
    pub id: ProposalId,
    pub content: String,
    /// Member id, or "orchestrator" for detected proposals.
    pub proposed_by: String,
    pub proposed_by_name: String,
    pub origin: ProposalOrigin,
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub consensus_mode: ConsensusMode,
    pub timeout_seconds: u64,
}

impl CommitProposal {
    pub fn new(
        content: impl Into<String>,
        proposed_by: impl Into<String>,
        proposed_by_name: impl Into<String>,
        origin: ProposalOrigin,
        consensus_mode: ConsensusMode,
        timeout_seconds: u64,
    ) -> Self {
        Self {
            id: ProposalId::generate(),
            content: content.into(),
            proposed_by: proposed_by.into(),
            proposed_by_name: proposed_by_name.into(),
            origin,
            status: ProposalStatus::Pending,
            created_at: Utc::now(),
            resolved_at: None,
            consensus_mode,
            timeout_seconds,
        }
    }

    /// Moves the proposal to a terminal state. Fails if it already
    /// resolved; a terminal status never regresses.
    pub fn resolve(&mut self, status: ProposalStatus) -> Result<(), EngineError> {
        if self.status.is_terminal() {
            return Err(EngineError::ProposalAlreadyResolved {
                id: self.id.clone(),
                status: self.status.to_string(),
            });
        }
        debug_assert!(status.is_terminal());
        self.status = status;
        self.resolved_at = Some(Utc::now());
        Ok(())
    }

    /// The instant after which a pending `no_objection` proposal expires.
    pub fn deadline(&self) -> DateTime<Utc> {
        self.created_at + Duration::seconds(self.timeout_seconds as i64)
    }

    /// True when this proposal should be expired by the sweep: still
    /// pending, in `no_objection` mode, and past its captured deadline.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == ProposalStatus::Pending
            && self.consensus_mode == ConsensusMode::NoObjection
            && now >= self.deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal(mode: ConsensusMode, timeout: u64) -> CommitProposal {
        CommitProposal::new("decision", "m1", "Ava", ProposalOrigin::MemberNominated, mode, timeout)
    }

    #[test]
    fn test_resolve_once() {
        let mut p = proposal(ConsensusMode::Majority, 300);
        p.resolve(ProposalStatus::Approved).unwrap();
        assert_eq!(p.status, ProposalStatus::Approved);
        assert!(p.resolved_at.is_some());

        let err = p.resolve(ProposalStatus::Rejected).unwrap_err();
        assert!(matches!(err, EngineError::ProposalAlreadyResolved { .. }));
        // Terminal state untouched
        assert_eq!(p.status, ProposalStatus::Approved);
    }

    #[test]
    fn test_overdue_only_for_pending_no_objection() {
        let now = Utc::now() + Duration::seconds(600);

        let p = proposal(ConsensusMode::NoObjection, 300);
        assert!(p.is_overdue(now));
        assert!(!p.is_overdue(Utc::now()));

        // Majority proposals never expire
        let p = proposal(ConsensusMode::Majority, 300);
        assert!(!p.is_overdue(now));

        // Resolved proposals never expire
        let mut p = proposal(ConsensusMode::NoObjection, 300);
        p.resolve(ProposalStatus::Rejected).unwrap();
        assert!(!p.is_overdue(now));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ProposalStatus::Pending.to_string(), "pending");
        assert_eq!(ProposalStatus::Expired.to_string(), "expired");
    }
}
