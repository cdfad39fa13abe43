//! Authentication gate port.
//!
//! Credential issuance and session validation live in an external
//! collaborator. The engine only consumes the identity the gate produces;
//! admin operations check the role it carries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use squad_domain::{MemberId, SquadId};
use thiserror::Error;

/// Role attached to an authenticated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Member,
    Admin,
}

/// The identity an [`AuthGate`] resolves a credential to. Scoped to one
/// squad; a caller holding identities in several squads authenticates
/// once per squad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthIdentity {
    pub squad_id: SquadId,
    pub member_id: MemberId,
    pub role: Role,
}

impl AuthIdentity {
    pub fn new(squad_id: SquadId, member_id: MemberId, role: Role) -> Self {
        Self {
            squad_id,
            member_id,
            role,
        }
    }

    /// True when this identity may call admin operations.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Authentication failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("forbidden")]
    Forbidden,
}

/// Resolves a transport credential to a squad-scoped identity.
#[async_trait]
pub trait AuthGate: Send + Sync {
    async fn authenticate(&self, credential: &str) -> Result<AuthIdentity, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_admin() {
        let admin = AuthIdentity::new(SquadId::new("s1"), MemberId::new("m1"), Role::Admin);
        let member = AuthIdentity::new(SquadId::new("s1"), MemberId::new("m2"), Role::Member);
        assert!(admin.is_admin());
        assert!(!member.is_admin());
    }
}
