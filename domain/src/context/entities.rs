//! Canonical-context ledger entries.

use crate::core::id::{EntryId, ProposalId};
use crate::proposal::entities::ProposalOrigin;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ratified fact in the canonical context.
///
/// Entries are immutable and totally ordered by `version`, a per-squad
/// counter the ledger assigns at insertion. Versions start at 1 and are
/// never skipped or reused; reading entries in ascending version order is
/// part of the external contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextEntry {
    pub id: EntryId,
    pub content: String,
    pub committed_at: DateTime<Utc>,
    /// Display name of the proposer whose proposal was ratified.
    pub committed_by: String,
    pub origin: ProposalOrigin,
    /// The approved proposal that produced this entry.
    pub proposal_id: ProposalId,
    pub version: u64,
}

impl ContextEntry {
    /// Creates an entry. The caller (the ledger) assigns `version`.
    pub fn new(
        content: impl Into<String>,
        committed_by: impl Into<String>,
        origin: ProposalOrigin,
        proposal_id: ProposalId,
        version: u64,
    ) -> Self {
        Self {
            id: EntryId::generate(),
            content: content.into(),
            committed_at: Utc::now(),
            committed_by: committed_by.into(),
            origin,
            proposal_id,
            version,
        }
    }

    /// Renders this entry the way the context summary shows it.
    pub fn summary_line(&self) -> String {
        format!("[v{}] {}", self.version, self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line() {
        let entry = ContextEntry::new(
            "Use Rust for the backend",
            "Ava",
            ProposalOrigin::MemberNominated,
            ProposalId::new("c1"),
            3,
        );
        assert_eq!(entry.summary_line(), "[v3] Use Rust for the backend");
    }
}
