//! In-memory credential store.
//!
//! Tracks tokens issued per (squad, member) so the kick flow has
//! something real to revoke. Revocation is idempotent.

use async_trait::async_trait;
use squad_application::{CredentialError, CredentialStore};
use squad_domain::{MemberId, SquadId};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// [`CredentialStore`] holding issued tokens in process memory.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    issued: Mutex<HashMap<(SquadId, MemberId), Vec<String>>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a token as issued to the member.
    pub fn issue(&self, squad_id: &SquadId, member_id: &MemberId, token: impl Into<String>) {
        if let Ok(mut issued) = self.issued.lock() {
            issued
                .entry((squad_id.clone(), member_id.clone()))
                .or_default()
                .push(token.into());
        }
    }

    /// Tokens currently held by the member.
    pub fn tokens_for(&self, squad_id: &SquadId, member_id: &MemberId) -> Vec<String> {
        self.issued
            .lock()
            .ok()
            .and_then(|issued| issued.get(&(squad_id.clone(), member_id.clone())).cloned())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn revoke_all(
        &self,
        squad_id: &SquadId,
        member_id: &MemberId,
    ) -> Result<(), CredentialError> {
        let mut issued = self
            .issued
            .lock()
            .map_err(|_| CredentialError::Unavailable("credential table poisoned".into()))?;
        let removed = issued
            .remove(&(squad_id.clone(), member_id.clone()))
            .map_or(0, |tokens| tokens.len());
        debug!(squad_id = %squad_id, member_id = %member_id, removed, "credentials revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_revoke_all_clears_tokens_and_is_idempotent() {
        let store = InMemoryCredentialStore::new();
        let (sid, mid) = (SquadId::new("s1"), MemberId::new("m1"));
        store.issue(&sid, &mid, "tok-1");
        store.issue(&sid, &mid, "tok-2");
        assert_eq!(store.tokens_for(&sid, &mid).len(), 2);

        store.revoke_all(&sid, &mid).await.unwrap();
        assert!(store.tokens_for(&sid, &mid).is_empty());

        // Revoking a member with nothing issued still succeeds.
        store.revoke_all(&sid, &mid).await.unwrap();
    }
}
