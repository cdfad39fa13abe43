//! Result payloads returned by engine operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use squad_domain::{
    CommitProposal, ConsensusDecision, ConsensusMode, ContextEntry, Member, Message,
    ProposalStatus, Squad, SquadId, Vote, VoteTally,
};

/// A freshly created squad and its first admin member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadCreated {
    pub squad: Squad,
    pub creator: Member,
}

/// Result of joining a squad: the new member plus the system message
/// announcing them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinOutcome {
    pub member: Member,
    pub announcement: Message,
}

/// Result of casting a vote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub vote: Vote,
    /// The evaluator's verdict after this vote was recorded.
    pub decision: ConsensusDecision,
    /// Proposal status after this vote: still `pending`, or the terminal
    /// status the vote triggered.
    pub status: ProposalStatus,
    /// Present only when this vote approved the proposal: the ledger
    /// entry that was committed.
    pub committed_entry: Option<ContextEntry>,
}

/// A pending proposal with its live vote summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingProposal {
    pub proposal: CommitProposal,
    pub tally: VoteTally,
    /// Human-readable progress, e.g. `"pending (2/5 votes in)"`.
    pub progress: String,
}

/// The canonical context of one squad: the full ledger plus a rendered
/// summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextView {
    pub squad_id: SquadId,
    /// Highest committed version, 0 when the ledger is empty.
    pub version: u64,
    /// Entries in ascending version order.
    pub entries: Vec<ContextEntry>,
    /// One `[vN] content` line per entry.
    pub summary: String,
}

/// Point-in-time snapshot of a squad.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadStatus {
    pub squad_id: SquadId,
    pub name: String,
    pub consensus_mode: ConsensusMode,
    pub active_members: Vec<String>,
    pub message_count: usize,
    pub context_version: u64,
    pub pending_proposals: usize,
    pub created_at: DateTime<Utc>,
}
