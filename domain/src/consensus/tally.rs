//! Vote tallying.

use crate::proposal::vote::{Vote, VoteChoice};
use serde::{Deserialize, Serialize};

/// Aggregated counts for one proposal's votes.
///
/// `votes_needed` is the number of *currently active* squad members, not
/// a count snapshotted at proposal creation: membership changes between
/// votes shift the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub approvals: usize,
    pub rejections: usize,
    pub abstentions: usize,
    /// Votes cast so far (every choice counts, including abstentions).
    pub votes_in: usize,
    /// Active members eligible to vote, recomputed at evaluation time.
    pub votes_needed: usize,
}

impl VoteTally {
    /// Counts `votes` against `active_members` eligible voters.
    pub fn count(votes: &[Vote], active_members: usize) -> Self {
        let approvals = votes.iter().filter(|v| v.choice == VoteChoice::Approve).count();
        let rejections = votes.iter().filter(|v| v.choice == VoteChoice::Reject).count();
        let abstentions = votes.iter().filter(|v| v.choice == VoteChoice::Abstain).count();
        Self {
            approvals,
            rejections,
            abstentions,
            votes_in: votes.len(),
            votes_needed: active_members,
        }
    }

    /// True once every active member has cast a vote.
    pub fn everyone_voted(&self) -> bool {
        self.votes_in >= self.votes_needed
    }

    /// True when approvals strictly exceed half the active count.
    /// An exact half under an even member count is not a majority.
    pub fn has_strict_majority(&self) -> bool {
        self.approvals * 2 > self.votes_needed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::id::{MemberId, ProposalId};

    fn vote(n: u32, choice: VoteChoice) -> Vote {
        Vote::new(
            ProposalId::new("c1"),
            MemberId::new(format!("m{n}")),
            format!("member-{n}"),
            choice,
            false,
        )
    }

    #[test]
    fn test_count() {
        let votes = vec![
            vote(1, VoteChoice::Approve),
            vote(2, VoteChoice::Approve),
            vote(3, VoteChoice::Reject),
            vote(4, VoteChoice::Abstain),
        ];
        let tally = VoteTally::count(&votes, 5);
        assert_eq!(tally.approvals, 2);
        assert_eq!(tally.rejections, 1);
        assert_eq!(tally.abstentions, 1);
        assert_eq!(tally.votes_in, 4);
        assert_eq!(tally.votes_needed, 5);
        assert!(!tally.everyone_voted());
    }

    #[test]
    fn test_strict_majority_rejects_exact_half() {
        // 2 of 4 is not a majority
        let tally = VoteTally {
            approvals: 2,
            rejections: 2,
            abstentions: 0,
            votes_in: 4,
            votes_needed: 4,
        };
        assert!(!tally.has_strict_majority());

        // 3 of 4 is
        let tally = VoteTally { approvals: 3, ..tally };
        assert!(tally.has_strict_majority());

        // 2 of 3 is
        let tally = VoteTally {
            approvals: 2,
            rejections: 1,
            abstentions: 0,
            votes_in: 3,
            votes_needed: 3,
        };
        assert!(tally.has_strict_majority());
    }
}
