//! Squad entity - the multi-tenant isolation boundary.

use crate::consensus::mode::ConsensusMode;
use crate::core::id::{MemberId, SquadId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How strictly sessions are bound to a client fingerprint.
///
/// Enforcement happens in the session-validation collaborator; the engine
/// only stores the policy and hands it out with squad settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintPolicy {
    /// Fingerprint mismatches are tolerated.
    Relaxed,
    /// One active session per enrollment; a new session displaces the old.
    #[default]
    SingleSession,
    /// Fingerprint mismatches terminate the session.
    Strict,
}

impl std::fmt::Display for FingerprintPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FingerprintPolicy::Relaxed => write!(f, "relaxed"),
            FingerprintPolicy::SingleSession => write!(f, "single_session"),
            FingerprintPolicy::Strict => write!(f, "strict"),
        }
    }
}

/// A squad: an isolated workspace of members, messages, and one canonical
/// context. Squads own their content by reference; entities carry their
/// own ids and survive member deactivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Squad {
    pub id: SquadId,
    pub name: String,
    /// Default consensus mode for new proposals. Proposals capture this
    /// value at creation time and are immune to later changes.
    pub consensus_mode: ConsensusMode,
    /// Default timeout captured by new proposals; only `no_objection`
    /// proposals are expired by the sweep.
    pub commit_timeout_seconds: u64,
    pub session_ttl_hours: u32,
    pub fingerprint_policy: FingerprintPolicy,
    pub created_at: DateTime<Utc>,
    /// Member id of the creator, who is the first admin.
    pub created_by: MemberId,
    pub is_active: bool,
}

impl Squad {
    /// Creates a squad with the given name and defaults.
    pub fn new(
        name: impl Into<String>,
        consensus_mode: ConsensusMode,
        commit_timeout_seconds: u64,
        created_by: MemberId,
    ) -> Self {
        Self {
            id: SquadId::generate(),
            name: name.into(),
            consensus_mode,
            commit_timeout_seconds,
            session_ttl_hours: 24,
            fingerprint_policy: FingerprintPolicy::default(),
            created_at: Utc::now(),
            created_by,
            is_active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_squad_defaults() {
        let creator = MemberId::new("m1");
        let squad = Squad::new("core-team", ConsensusMode::Majority, 300, creator.clone());

        assert_eq!(squad.name, "core-team");
        assert_eq!(squad.consensus_mode, ConsensusMode::Majority);
        assert_eq!(squad.commit_timeout_seconds, 300);
        assert_eq!(squad.session_ttl_hours, 24);
        assert_eq!(squad.fingerprint_policy, FingerprintPolicy::SingleSession);
        assert_eq!(squad.created_by, creator);
        assert!(squad.is_active);
    }

    #[test]
    fn test_fingerprint_policy_serde() {
        let json = serde_json::to_string(&FingerprintPolicy::SingleSession).unwrap();
        assert_eq!(json, "\"single_session\"");
        let back: FingerprintPolicy = serde_json::from_str("\"strict\"").unwrap();
        assert_eq!(back, FingerprintPolicy::Strict);
    }
}
