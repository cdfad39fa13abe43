//! Static-token authentication gate.
//!
//! Maps opaque bearer tokens to squad-scoped identities from an
//! in-process table. Suitable for a single-process deployment and for
//! tests; a real deployment swaps in a session-backed gate behind the
//! same port.

use async_trait::async_trait;
use squad_application::{AuthError, AuthGate, AuthIdentity};
use std::collections::HashMap;
use std::sync::RwLock;

/// [`AuthGate`] backed by a fixed token table.
#[derive(Default)]
pub struct StaticAuthGate {
    tokens: RwLock<HashMap<String, AuthIdentity>>,
}

impl StaticAuthGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token for an identity, replacing any previous binding.
    pub fn register(&self, token: impl Into<String>, identity: AuthIdentity) {
        if let Ok(mut tokens) = self.tokens.write() {
            tokens.insert(token.into(), identity);
        }
    }

    /// Removes a token.
    pub fn revoke(&self, token: &str) {
        if let Ok(mut tokens) = self.tokens.write() {
            tokens.remove(token);
        }
    }
}

#[async_trait]
impl AuthGate for StaticAuthGate {
    async fn authenticate(&self, credential: &str) -> Result<AuthIdentity, AuthError> {
        self.tokens
            .read()
            .map_err(|_| AuthError::Unauthenticated)?
            .get(credential)
            .cloned()
            .ok_or(AuthError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squad_application::Role;
    use squad_domain::{MemberId, SquadId};

    #[tokio::test]
    async fn test_registered_token_authenticates() {
        let gate = StaticAuthGate::new();
        let identity = AuthIdentity::new(SquadId::new("s1"), MemberId::new("m1"), Role::Admin);
        gate.register("tok-1", identity.clone());

        assert_eq!(gate.authenticate("tok-1").await.unwrap(), identity);
        assert_eq!(
            gate.authenticate("tok-2").await.unwrap_err(),
            AuthError::Unauthenticated
        );
    }

    #[tokio::test]
    async fn test_revoked_token_stops_authenticating() {
        let gate = StaticAuthGate::new();
        let identity = AuthIdentity::new(SquadId::new("s1"), MemberId::new("m1"), Role::Member);
        gate.register("tok-1", identity);
        gate.revoke("tok-1");

        assert!(gate.authenticate("tok-1").await.is_err());
    }
}
