//! Squad settings updates.
//!
//! Settings changes arrive as a struct of named optional fields rather
//! than an open-ended key/value map; unknown keys are rejected when the
//! update is deserialized at the boundary.

use super::entities::{FingerprintPolicy, Squad};
use crate::consensus::mode::ConsensusMode;
use crate::core::error::EngineError;
use serde::{Deserialize, Serialize};

/// Partial update to a squad's settings. Fields left as `None` are
/// untouched. Proposals already opened keep the mode and timeout they
/// captured at creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SquadSettingsUpdate {
    pub name: Option<String>,
    pub consensus_mode: Option<ConsensusMode>,
    pub commit_timeout_seconds: Option<u64>,
    pub session_ttl_hours: Option<u32>,
    pub fingerprint_policy: Option<FingerprintPolicy>,
}

impl SquadSettingsUpdate {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.consensus_mode.is_none()
            && self.commit_timeout_seconds.is_none()
            && self.session_ttl_hours.is_none()
            && self.fingerprint_policy.is_none()
    }

    /// Validates the update and applies it to `squad`, returning the list
    /// of field names that changed.
    pub fn apply(self, squad: &mut Squad) -> Result<Vec<&'static str>, EngineError> {
        if self.is_empty() {
            return Err(EngineError::InvalidArgument(
                "no settings provided".into(),
            ));
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(EngineError::InvalidArgument(
                    "squad name must not be empty".into(),
                ));
            }
        }

        let mut changed = Vec::new();
        if let Some(name) = self.name {
            squad.name = name;
            changed.push("name");
        }
        if let Some(mode) = self.consensus_mode {
            squad.consensus_mode = mode;
            changed.push("consensus_mode");
        }
        if let Some(timeout) = self.commit_timeout_seconds {
            squad.commit_timeout_seconds = timeout;
            changed.push("commit_timeout_seconds");
        }
        if let Some(ttl) = self.session_ttl_hours {
            squad.session_ttl_hours = ttl;
            changed.push("session_ttl_hours");
        }
        if let Some(policy) = self.fingerprint_policy {
            squad.fingerprint_policy = policy;
            changed.push("fingerprint_policy");
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::id::MemberId;

    fn squad() -> Squad {
        Squad::new("s", ConsensusMode::Majority, 300, MemberId::new("m1"))
    }

    #[test]
    fn test_empty_update_rejected() {
        let err = SquadSettingsUpdate::default().apply(&mut squad());
        assert!(matches!(err, Err(EngineError::InvalidArgument(_))));
    }

    #[test]
    fn test_apply_changes_only_named_fields() {
        let mut s = squad();
        let update = SquadSettingsUpdate {
            consensus_mode: Some(ConsensusMode::Unanimous),
            commit_timeout_seconds: Some(60),
            ..Default::default()
        };
        let changed = update.apply(&mut s).unwrap();
        assert_eq!(changed, vec!["consensus_mode", "commit_timeout_seconds"]);
        assert_eq!(s.consensus_mode, ConsensusMode::Unanimous);
        assert_eq!(s.commit_timeout_seconds, 60);
        assert_eq!(s.name, "s");
    }

    #[test]
    fn test_blank_name_rejected() {
        let update = SquadSettingsUpdate {
            name: Some("   ".into()),
            ..Default::default()
        };
        assert!(update.apply(&mut squad()).is_err());
    }

    #[test]
    fn test_unknown_keys_rejected_at_boundary() {
        let result: Result<SquadSettingsUpdate, _> =
            serde_json::from_str(r#"{"consensus_mode":"majority","max_members":20}"#);
        assert!(result.is_err());
    }
}
