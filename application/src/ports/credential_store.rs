//! Credential store port.
//!
//! Used by the kick and key-rotation flows. Revocation must succeed
//! before a member is deactivated: a member left active-but-revoked is
//! recoverable, while deactivated-but-credentialed is a zombie identity
//! that can still authenticate.

use async_trait::async_trait;
use squad_domain::{MemberId, SquadId};
use thiserror::Error;

/// Failures revoking credentials.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("credential backend unavailable: {0}")]
    Unavailable(String),

    #[error("revocation rejected: {0}")]
    Rejected(String),
}

/// External store of enrollment keys and sessions.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Revokes every credential and session held by `member_id` in
    /// `squad_id`. Idempotent: revoking a member with no credentials
    /// succeeds.
    async fn revoke_all(
        &self,
        squad_id: &SquadId,
        member_id: &MemberId,
    ) -> Result<(), CredentialError>;
}
