//! Engine error types.
//!
//! Expected failures cross the engine boundary as values, never as panics.
//! Transport adapters map [`ErrorKind`] onto their own status codes.

use crate::core::id::{MemberId, ProposalId, SquadId};
use serde::Serialize;
use thiserror::Error;

/// Coarse classification of an [`EngineError`], for transport adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A referenced squad, member, or proposal does not exist.
    NotFound,
    /// The operation conflicts with current state (name taken,
    /// proposal already resolved).
    Conflict,
    /// The caller supplied a malformed argument.
    InvalidArgument,
    /// The authenticated identity lacks the required role.
    Forbidden,
    /// Storage or collaborator failure; not recoverable by the caller.
    Internal,
}

/// Errors produced by engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("squad '{0}' not found")]
    SquadNotFound(SquadId),

    #[error("'{0}' is not in the squad")]
    NotAMember(String),

    #[error("member '{0}' not found")]
    MemberNotFound(MemberId),

    #[error("'{0}' is already in the squad")]
    NameTaken(String),

    #[error("proposal '{0}' not found")]
    ProposalNotFound(ProposalId),

    #[error("proposal '{id}' is already {status}")]
    ProposalAlreadyResolved { id: ProposalId, status: String },

    #[error("choice must be 'approve', 'reject', or 'abstain' (got '{0}')")]
    InvalidChoice(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("admin access required")]
    AdminRequired,

    #[error("credential revocation failed: {0}")]
    RevocationFailed(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Classify this error for the transport boundary.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::SquadNotFound(_)
            | EngineError::NotAMember(_)
            | EngineError::MemberNotFound(_)
            | EngineError::ProposalNotFound(_) => ErrorKind::NotFound,
            EngineError::NameTaken(_) | EngineError::ProposalAlreadyResolved { .. } => {
                ErrorKind::Conflict
            }
            EngineError::InvalidChoice(_) | EngineError::InvalidArgument(_) => {
                ErrorKind::InvalidArgument
            }
            EngineError::AdminRequired => ErrorKind::Forbidden,
            EngineError::RevocationFailed(_) | EngineError::Internal(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::NameTaken("Ava".into());
        assert_eq!(err.to_string(), "'Ava' is already in the squad");

        let err = EngineError::ProposalAlreadyResolved {
            id: ProposalId::new("c1"),
            status: "approved".into(),
        };
        assert_eq!(err.to_string(), "proposal 'c1' is already approved");
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            EngineError::SquadNotFound(SquadId::new("s1")).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            EngineError::NameTaken("Ava".into()).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            EngineError::InvalidChoice("maybe".into()).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(EngineError::AdminRequired.kind(), ErrorKind::Forbidden);
        assert_eq!(
            EngineError::Internal("lock poisoned".into()).kind(),
            ErrorKind::Internal
        );
    }
}
