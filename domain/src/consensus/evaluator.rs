//! The consensus evaluator.
//!
//! Pure decision logic: given a proposal's captured mode, the votes cast
//! so far, and the live active-member count, decide whether the proposal
//! resolves and why. The evaluator never mutates anything; the engine
//! re-runs it after every vote and applies the verdict.

use super::mode::ConsensusMode;
use super::tally::VoteTally;
use crate::proposal::vote::Vote;
use serde::{Deserialize, Serialize};

/// Verdict of one evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusOutcome {
    Approved,
    Rejected,
    Pending,
}

impl ConsensusOutcome {
    pub fn is_approved(&self) -> bool {
        matches!(self, ConsensusOutcome::Approved)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, ConsensusOutcome::Rejected)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ConsensusOutcome::Pending)
    }
}

/// Why a proposal resolved the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionReason {
    /// A human-cast rejection vetoed the proposal, overriding every mode.
    HumanVeto,
    /// All active members approved.
    Unanimous,
    /// Unanimity required but someone rejected.
    NotUnanimous,
    /// Everyone voted and approvals exceeded half the active count.
    Majority,
    /// Approvals exceeded half the active count before all votes were in.
    EarlyMajority,
    /// Everyone voted without a strict majority approving.
    NoMajority,
    /// A rejection under no-objection mode.
    ObjectionRaised,
    /// The captured no-objection timeout elapsed with no resolution.
    Expired,
}

impl std::fmt::Display for ResolutionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionReason::HumanVeto => write!(f, "human_veto"),
            ResolutionReason::Unanimous => write!(f, "unanimous"),
            ResolutionReason::NotUnanimous => write!(f, "not_unanimous"),
            ResolutionReason::Majority => write!(f, "majority"),
            ResolutionReason::EarlyMajority => write!(f, "early_majority"),
            ResolutionReason::NoMajority => write!(f, "no_majority"),
            ResolutionReason::ObjectionRaised => write!(f, "objection_raised"),
            ResolutionReason::Expired => write!(f, "expired"),
        }
    }
}

/// The evaluator's full answer: outcome, reason (for resolutions), and
/// the tally the decision was based on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusDecision {
    pub outcome: ConsensusOutcome,
    pub reason: Option<ResolutionReason>,
    pub tally: VoteTally,
}

impl ConsensusDecision {
    fn resolved(outcome: ConsensusOutcome, reason: ResolutionReason, tally: VoteTally) -> Self {
        Self {
            outcome,
            reason: Some(reason),
            tally,
        }
    }

    fn pending(tally: VoteTally) -> Self {
        Self {
            outcome: ConsensusOutcome::Pending,
            reason: None,
            tally,
        }
    }

    /// Short description for announcements, e.g. `"majority (3/4)"`.
    pub fn describe(&self) -> String {
        match self.reason {
            Some(reason @ (ResolutionReason::Majority | ResolutionReason::EarlyMajority)) => {
                format!("{} ({}/{})", reason, self.tally.approvals, self.tally.votes_needed)
            }
            Some(reason) => reason.to_string(),
            None => format!(
                "pending ({}/{} votes in)",
                self.tally.votes_in, self.tally.votes_needed
            ),
        }
    }
}

/// Evaluates a proposal deterministically.
///
/// Checks run in a fixed order:
/// 1. human veto (any mode, short-circuits everything else),
/// 2. the captured mode's own rule,
/// 3. otherwise pending with a progress snapshot.
///
/// `active_members` is the squad's live active count; the caller must
/// recompute it at each evaluation rather than snapshot it at proposal
/// creation.
pub fn evaluate(mode: ConsensusMode, votes: &[Vote], active_members: usize) -> ConsensusDecision {
    let tally = VoteTally::count(votes, active_members);

    if votes.iter().any(Vote::is_human_veto) {
        return ConsensusDecision::resolved(
            ConsensusOutcome::Rejected,
            ResolutionReason::HumanVeto,
            tally,
        );
    }

    match mode {
        ConsensusMode::Unanimous => {
            if tally.rejections > 0 {
                return ConsensusDecision::resolved(
                    ConsensusOutcome::Rejected,
                    ResolutionReason::NotUnanimous,
                    tally,
                );
            }
            // Abstentions don't count toward the threshold; approvals must
            // match the live active count exactly.
            if tally.approvals == tally.votes_needed {
                return ConsensusDecision::resolved(
                    ConsensusOutcome::Approved,
                    ResolutionReason::Unanimous,
                    tally,
                );
            }
        }
        ConsensusMode::Majority => {
            if tally.everyone_voted() {
                if tally.has_strict_majority() {
                    return ConsensusDecision::resolved(
                        ConsensusOutcome::Approved,
                        ResolutionReason::Majority,
                        tally,
                    );
                }
                return ConsensusDecision::resolved(
                    ConsensusOutcome::Rejected,
                    ResolutionReason::NoMajority,
                    tally,
                );
            }
            if tally.has_strict_majority() {
                return ConsensusDecision::resolved(
                    ConsensusOutcome::Approved,
                    ResolutionReason::EarlyMajority,
                    tally,
                );
            }
        }
        ConsensusMode::NoObjection => {
            if tally.rejections > 0 {
                return ConsensusDecision::resolved(
                    ConsensusOutcome::Rejected,
                    ResolutionReason::ObjectionRaised,
                    tally,
                );
            }
            // Approval happens by timeout, handled by the expiry sweep.
        }
    }

    ConsensusDecision::pending(tally)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::id::{MemberId, ProposalId};
    use crate::proposal::vote::VoteChoice;

    fn vote(n: u32, choice: VoteChoice) -> Vote {
        Vote::new(
            ProposalId::new("c1"),
            MemberId::new(format!("m{n}")),
            format!("member-{n}"),
            choice,
            false,
        )
    }

    fn human_reject(n: u32) -> Vote {
        Vote::new(
            ProposalId::new("c1"),
            MemberId::new(format!("m{n}")),
            format!("member-{n}"),
            VoteChoice::Reject,
            true,
        )
    }

    #[test]
    fn test_human_veto_short_circuits_every_mode() {
        for mode in [
            ConsensusMode::Unanimous,
            ConsensusMode::Majority,
            ConsensusMode::NoObjection,
        ] {
            let votes = vec![
                vote(1, VoteChoice::Approve),
                vote(2, VoteChoice::Approve),
                human_reject(3),
            ];
            let decision = evaluate(mode, &votes, 3);
            assert!(decision.outcome.is_rejected(), "mode {mode}");
            assert_eq!(decision.reason, Some(ResolutionReason::HumanVeto));
        }
    }

    #[test]
    fn test_human_veto_wins_even_after_everyone_else_approved() {
        // 3 of 4 already approved; the last voter's human reject still vetoes.
        let votes = vec![
            vote(1, VoteChoice::Approve),
            vote(2, VoteChoice::Approve),
            vote(3, VoteChoice::Approve),
            human_reject(4),
        ];
        let decision = evaluate(ConsensusMode::Unanimous, &votes, 4);
        assert_eq!(decision.reason, Some(ResolutionReason::HumanVeto));
    }

    #[test]
    fn test_agent_reject_is_not_a_veto_in_majority() {
        let votes = vec![
            vote(1, VoteChoice::Approve),
            vote(2, VoteChoice::Approve),
            vote(3, VoteChoice::Reject),
        ];
        let decision = evaluate(ConsensusMode::Majority, &votes, 3);
        // 2 of 3 is a strict majority despite the rejection
        assert!(decision.outcome.is_approved());
    }

    #[test]
    fn test_unanimous_requires_every_active_member() {
        let votes = vec![vote(1, VoteChoice::Approve), vote(2, VoteChoice::Approve)];
        let decision = evaluate(ConsensusMode::Unanimous, &votes, 3);
        assert!(decision.outcome.is_pending());

        let votes = vec![
            vote(1, VoteChoice::Approve),
            vote(2, VoteChoice::Approve),
            vote(3, VoteChoice::Approve),
        ];
        let decision = evaluate(ConsensusMode::Unanimous, &votes, 3);
        assert_eq!(decision.reason, Some(ResolutionReason::Unanimous));
    }

    #[test]
    fn test_unanimous_abstention_stalls_forever() {
        // approve, approve, abstain with 3 active members: approvals (2)
        // never reach the total (3) and nothing rejected, so this stays
        // pending indefinitely. Deliberate; do not "fix".
        let votes = vec![
            vote(1, VoteChoice::Approve),
            vote(2, VoteChoice::Approve),
            vote(3, VoteChoice::Abstain),
        ];
        let decision = evaluate(ConsensusMode::Unanimous, &votes, 3);
        assert!(decision.outcome.is_pending());
        assert!(decision.tally.everyone_voted());
    }

    #[test]
    fn test_unanimous_any_reject() {
        let votes = vec![vote(1, VoteChoice::Approve), vote(2, VoteChoice::Reject)];
        let decision = evaluate(ConsensusMode::Unanimous, &votes, 3);
        assert_eq!(decision.reason, Some(ResolutionReason::NotUnanimous));
    }

    #[test]
    fn test_majority_four_members_spec_walkthrough() {
        // approve, approve, reject: 2 of 4 is not > half, still pending
        let mut votes = vec![
            vote(1, VoteChoice::Approve),
            vote(2, VoteChoice::Approve),
            vote(3, VoteChoice::Reject),
        ];
        let decision = evaluate(ConsensusMode::Majority, &votes, 4);
        assert!(decision.outcome.is_pending());
        assert_eq!(decision.tally.votes_in, 3);

        // fourth vote reject: everyone voted, 2 of 4 approvals, rejected
        votes.push(vote(4, VoteChoice::Reject));
        let decision = evaluate(ConsensusMode::Majority, &votes, 4);
        assert_eq!(decision.reason, Some(ResolutionReason::NoMajority));

        // fourth vote approve instead: 3 of 4, approved
        votes.pop();
        votes.push(vote(4, VoteChoice::Approve));
        let decision = evaluate(ConsensusMode::Majority, &votes, 4);
        assert_eq!(decision.reason, Some(ResolutionReason::Majority));
        assert_eq!(decision.describe(), "majority (3/4)");
    }

    #[test]
    fn test_majority_abstention_counts_as_voted() {
        // approve, approve, reject, abstain: all 4 in, 2 not > 2, rejected
        let votes = vec![
            vote(1, VoteChoice::Approve),
            vote(2, VoteChoice::Approve),
            vote(3, VoteChoice::Reject),
            vote(4, VoteChoice::Abstain),
        ];
        let decision = evaluate(ConsensusMode::Majority, &votes, 4);
        assert_eq!(decision.reason, Some(ResolutionReason::NoMajority));
    }

    #[test]
    fn test_early_majority() {
        // 3 approvals of 5 before all votes in: resolves immediately
        let votes = vec![
            vote(1, VoteChoice::Approve),
            vote(2, VoteChoice::Approve),
            vote(3, VoteChoice::Approve),
        ];
        let decision = evaluate(ConsensusMode::Majority, &votes, 5);
        assert_eq!(decision.reason, Some(ResolutionReason::EarlyMajority));
        assert_eq!(decision.describe(), "early_majority (3/5)");
    }

    #[test]
    fn test_majority_exact_half_is_rejection() {
        let votes = vec![
            vote(1, VoteChoice::Approve),
            vote(2, VoteChoice::Approve),
            vote(3, VoteChoice::Reject),
            vote(4, VoteChoice::Reject),
        ];
        let decision = evaluate(ConsensusMode::Majority, &votes, 4);
        assert_eq!(decision.reason, Some(ResolutionReason::NoMajority));
    }

    #[test]
    fn test_no_objection_rejects_on_any_objection() {
        let votes = vec![vote(1, VoteChoice::Approve), vote(2, VoteChoice::Reject)];
        let decision = evaluate(ConsensusMode::NoObjection, &votes, 5);
        assert_eq!(decision.reason, Some(ResolutionReason::ObjectionRaised));
    }

    #[test]
    fn test_no_objection_stays_pending_without_rejections() {
        // Everyone approved and it still waits for the timeout sweep.
        let votes = vec![vote(1, VoteChoice::Approve), vote(2, VoteChoice::Approve)];
        let decision = evaluate(ConsensusMode::NoObjection, &votes, 2);
        assert!(decision.outcome.is_pending());
    }

    #[test]
    fn test_pending_snapshot_counts() {
        let votes = vec![vote(1, VoteChoice::Approve), vote(2, VoteChoice::Reject)];
        let decision = evaluate(ConsensusMode::Majority, &votes, 5);
        assert!(decision.outcome.is_pending());
        assert_eq!(decision.tally.votes_in, 2);
        assert_eq!(decision.tally.votes_needed, 5);
        assert_eq!(decision.tally.approvals, 1);
        assert_eq!(decision.tally.rejections, 1);
        assert_eq!(decision.describe(), "pending (2/5 votes in)");
    }

    #[test]
    fn test_threshold_recomputed_from_live_count() {
        // Same votes, different active counts: the verdict follows the
        // live membership, not a snapshot.
        let votes = vec![vote(1, VoteChoice::Approve), vote(2, VoteChoice::Approve)];
        assert!(evaluate(ConsensusMode::Majority, &votes, 3).outcome.is_approved());
        assert!(evaluate(ConsensusMode::Majority, &votes, 5).outcome.is_pending());
    }
}
