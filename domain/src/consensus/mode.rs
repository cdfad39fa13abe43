//! Consensus modes governing vote resolution.

use serde::{Deserialize, Serialize};

/// Rule set a proposal is resolved under. Captured by each proposal at
/// creation time from its squad's settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusMode {
    /// Every active member must approve. Abstentions never count toward
    /// the threshold, so a proposal with abstainers can stall forever.
    Unanimous,

    /// Approvals must strictly exceed half the active-member count.
    /// Resolves early once that bar is cleared; an exact half is a
    /// rejection.
    #[default]
    Majority,

    /// Passes unless someone objects; any rejection resolves it
    /// immediately, otherwise it expires after the captured timeout.
    NoObjection,
}

impl ConsensusMode {
    /// Human-readable description of this mode.
    pub fn description(&self) -> &'static str {
        match self {
            ConsensusMode::Unanimous => "unanimous (all active members must approve)",
            ConsensusMode::Majority => "majority (more than half must approve)",
            ConsensusMode::NoObjection => "no objection (passes unless rejected before timeout)",
        }
    }
}

impl std::fmt::Display for ConsensusMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsensusMode::Unanimous => write!(f, "unanimous"),
            ConsensusMode::Majority => write!(f, "majority"),
            ConsensusMode::NoObjection => write!(f, "no_objection"),
        }
    }
}

impl std::str::FromStr for ConsensusMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unanimous" => Ok(ConsensusMode::Unanimous),
            "majority" => Ok(ConsensusMode::Majority),
            "no_objection" | "no-objection" => Ok(ConsensusMode::NoObjection),
            _ => Err(format!(
                "unknown consensus mode: {}. Valid: unanimous, majority, no_objection",
                s
            )),
        }
    }
}
