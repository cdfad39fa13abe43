//! Votes on commit proposals.

use crate::core::error::EngineError;
use crate::core::id::{MemberId, ProposalId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A voter's position on a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteChoice {
    Approve,
    Reject,
    Abstain,
}

impl std::fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoteChoice::Approve => write!(f, "approve"),
            VoteChoice::Reject => write!(f, "reject"),
            VoteChoice::Abstain => write!(f, "abstain"),
        }
    }
}

impl std::str::FromStr for VoteChoice {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "approve" => Ok(VoteChoice::Approve),
            "reject" => Ok(VoteChoice::Reject),
            "abstain" => Ok(VoteChoice::Abstain),
            other => Err(EngineError::InvalidChoice(other.to_string())),
        }
    }
}

/// One member's vote on one proposal. Unique per (proposal, member):
/// voting again overwrites the previous choice instead of erroring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub proposal_id: ProposalId,
    pub voter_id: MemberId,
    pub voter_name: String,
    pub choice: VoteChoice,
    /// True when the human half of the pair cast this vote themselves.
    /// A rejecting human-override vote vetoes the proposal in every mode.
    pub is_human_override: bool,
    pub voted_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(
        proposal_id: ProposalId,
        voter_id: MemberId,
        voter_name: impl Into<String>,
        choice: VoteChoice,
        is_human_override: bool,
    ) -> Self {
        Self {
            proposal_id,
            voter_id,
            voter_name: voter_name.into(),
            choice,
            is_human_override,
            voted_at: Utc::now(),
        }
    }

    /// True for a rejecting vote flagged as human-cast.
    pub fn is_human_veto(&self) -> bool {
        self.choice == VoteChoice::Reject && self.is_human_override
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_choice_parsing() {
        assert_eq!(VoteChoice::from_str("approve").unwrap(), VoteChoice::Approve);
        assert_eq!(VoteChoice::from_str("REJECT").unwrap(), VoteChoice::Reject);
        assert_eq!(VoteChoice::from_str("abstain").unwrap(), VoteChoice::Abstain);
        assert!(matches!(
            VoteChoice::from_str("maybe"),
            Err(EngineError::InvalidChoice(_))
        ));
    }

    #[test]
    fn test_human_veto_detection() {
        let veto = Vote::new(
            ProposalId::new("c1"),
            MemberId::new("m1"),
            "Ava",
            VoteChoice::Reject,
            true,
        );
        assert!(veto.is_human_veto());

        let agent_reject = Vote::new(
            ProposalId::new("c1"),
            MemberId::new("m1"),
            "Ava",
            VoteChoice::Reject,
            false,
        );
        assert!(!agent_reject.is_human_veto());

        let human_approve = Vote::new(
            ProposalId::new("c1"),
            MemberId::new("m1"),
            "Ava",
            VoteChoice::Approve,
            true,
        );
        assert!(!human_approve.is_human_veto());
    }
}
