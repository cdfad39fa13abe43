//! Domain layer for squad-orchestrator.
//!
//! This crate contains the core entities and decision logic with no
//! dependencies on infrastructure or transport concerns.
//!
//! # Core concepts
//!
//! ## Squad
//!
//! A squad is an isolated workspace of human+AI member pairs who exchange
//! free-form messages and periodically ratify a decision into the squad's
//! **canonical context**: an append-only, versioned record of agreed facts.
//!
//! ## Commit protocol
//!
//! A member (or the orchestrator, on detecting convergence) opens a
//! **commit proposal**. Members vote; the deterministic evaluator in
//! [`consensus`] resolves the proposal under the consensus mode the
//! proposal captured at creation. Approved proposals become ledger
//! entries; a rejecting human-cast vote vetoes in any mode.

pub mod consensus;
pub mod context;
pub mod core;
pub mod member;
pub mod message;
pub mod proposal;
pub mod squad;

// Re-export commonly used types
pub use consensus::{
    evaluator::{evaluate, ConsensusDecision, ConsensusOutcome, ResolutionReason},
    mode::ConsensusMode,
    tally::VoteTally,
};
pub use context::entities::ContextEntry;
pub use crate::core::{
    error::{EngineError, ErrorKind},
    id::{EntryId, MemberId, MessageId, ProposalId, SquadId},
};
pub use member::entities::{Member, MemberRole};
pub use message::entities::{
    Message, SenderKind, ORCHESTRATOR_SENDER_ID, ORCHESTRATOR_SENDER_NAME,
};
pub use proposal::{
    entities::{CommitProposal, ProposalOrigin, ProposalStatus},
    vote::{Vote, VoteChoice},
};
pub use squad::{
    entities::{FingerprintPolicy, Squad},
    settings::SquadSettingsUpdate,
};
