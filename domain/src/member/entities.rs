//! Squad member entity.

use crate::core::id::MemberId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role a member holds inside a squad. The authenticated identity carries
/// the role the transport boundary actually enforces; this field mirrors
/// it for display and for seeding the AuthGate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    #[default]
    Member,
    Admin,
}

/// A human + AI agent pair inside one squad.
///
/// Members are never hard-deleted: leaving or being kicked flips
/// `is_active` so that messages and votes keep their provenance. A
/// display name is unique only among active members, so someone can
/// rejoin under the same name and receive a fresh id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    /// Which AI model the agent half runs on (e.g. "claude", "gpt").
    pub model: String,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
    pub is_active: bool,
    /// Link to a third-party identity, if one was attached. Linking
    /// itself is an external collaborator's job.
    pub external_identity: Option<String>,
}

impl Member {
    /// Creates an active member with a fresh id.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: MemberId::generate(),
            name: name.into(),
            model: model.into(),
            role: MemberRole::Member,
            joined_at: Utc::now(),
            is_active: true,
            external_identity: None,
        }
    }

    /// Marks this member as the squad admin.
    pub fn with_role(mut self, role: MemberRole) -> Self {
        self.role = role;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_member_is_active() {
        let m = Member::new("Ava", "claude");
        assert!(m.is_active);
        assert_eq!(m.role, MemberRole::Member);
        assert!(m.external_identity.is_none());
    }

    #[test]
    fn test_with_role() {
        let m = Member::new("Ava", "claude").with_role(MemberRole::Admin);
        assert_eq!(m.role, MemberRole::Admin);
    }

    #[test]
    fn test_fresh_ids_per_member() {
        let a = Member::new("Ava", "claude");
        let b = Member::new("Ava", "claude");
        assert_ne!(a.id, b.id);
    }
}
