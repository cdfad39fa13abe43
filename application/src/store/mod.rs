//! In-memory squad store.
//!
//! All state lives in one process. Each squad's state sits behind its own
//! mutex, which is the linearization point required by the consensus
//! protocol: ledger versions are assigned and proposals resolved while
//! holding it, so two concurrent approvals in one squad can neither
//! double-assign a version nor double-resolve a proposal. Operations on
//! different squads take different locks and proceed fully in parallel.

use squad_domain::{
    CommitProposal, ContextEntry, EngineError, Member, Message, ProposalId, ProposalOrigin,
    Squad, SquadId, Vote,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

/// Everything one squad owns. Only ever touched through
/// [`SquadStore::with_squad`], i.e. under the squad's mutex.
pub struct SquadState {
    pub squad: Squad,
    pub members: Vec<Member>,
    pub messages: Vec<Message>,
    pub entries: Vec<ContextEntry>,
    pub proposals: Vec<CommitProposal>,
    votes: HashMap<ProposalId, Vec<Vote>>,
}

impl SquadState {
    pub fn new(squad: Squad) -> Self {
        Self {
            squad,
            members: Vec::new(),
            messages: Vec::new(),
            entries: Vec::new(),
            proposals: Vec::new(),
            votes: HashMap::new(),
        }
    }

    // ── Members ──────────────────────────────────────────────────────

    pub fn active_members(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| m.is_active)
    }

    pub fn active_member_count(&self) -> usize {
        self.active_members().count()
    }

    /// Looks up an *active* member by display name. Deactivated members
    /// are invisible here; their name is free for reuse.
    pub fn find_active_by_name(&self, name: &str) -> Option<&Member> {
        self.active_members().find(|m| m.name == name)
    }

    pub fn find_active_by_name_mut(&mut self, name: &str) -> Option<&mut Member> {
        self.members
            .iter_mut()
            .find(|m| m.is_active && m.name == name)
    }

    pub fn member_by_id(&self, id: &squad_domain::MemberId) -> Option<&Member> {
        self.members.iter().find(|m| &m.id == id)
    }

    // ── Messages ─────────────────────────────────────────────────────

    pub fn push_message(&mut self, message: Message) -> Message {
        self.messages.push(message.clone());
        message
    }

    // ── Ledger ───────────────────────────────────────────────────────

    /// Highest assigned version, 0 for an empty ledger. Entries are
    /// append-only, so the last entry always carries the maximum.
    pub fn current_version(&self) -> u64 {
        self.entries.last().map_or(0, |e| e.version)
    }

    /// The only write path into the ledger. Assigns `current + 1` while
    /// the squad lock is held, which makes the sequence gap-free and
    /// duplicate-free.
    pub fn append_entry(
        &mut self,
        content: impl Into<String>,
        committed_by: impl Into<String>,
        origin: ProposalOrigin,
        proposal_id: ProposalId,
    ) -> ContextEntry {
        let entry = ContextEntry::new(
            content,
            committed_by,
            origin,
            proposal_id,
            self.current_version() + 1,
        );
        self.entries.push(entry.clone());
        entry
    }

    // ── Proposals & votes ────────────────────────────────────────────

    pub fn proposal(&self, id: &ProposalId) -> Option<&CommitProposal> {
        self.proposals.iter().find(|p| &p.id == id)
    }

    pub fn proposal_mut(&mut self, id: &ProposalId) -> Option<&mut CommitProposal> {
        self.proposals.iter_mut().find(|p| &p.id == id)
    }

    pub fn votes_for(&self, id: &ProposalId) -> &[Vote] {
        self.votes.get(id).map_or(&[], Vec::as_slice)
    }

    /// Records a vote, replacing any earlier vote by the same member on
    /// the same proposal.
    pub fn record_vote(&mut self, vote: Vote) {
        let votes = self.votes.entry(vote.proposal_id.clone()).or_default();
        votes.retain(|v| v.voter_id != vote.voter_id);
        votes.push(vote);
    }
}

/// Registry of squads, each behind its own lock.
pub struct SquadStore {
    squads: RwLock<HashMap<SquadId, Arc<Mutex<SquadState>>>>,
}

impl SquadStore {
    pub fn new() -> Self {
        Self {
            squads: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a new squad.
    pub fn insert(&self, squad: Squad) -> Result<SquadId, EngineError> {
        let id = squad.id.clone();
        let mut squads = self
            .squads
            .write()
            .map_err(|_| EngineError::Internal("squad registry lock poisoned".into()))?;
        squads.insert(id.clone(), Arc::new(Mutex::new(SquadState::new(squad))));
        Ok(id)
    }

    /// Runs `f` with exclusive access to one squad's state. The closure
    /// must not block; listener callbacks run after this lock is
    /// released.
    pub fn with_squad<T>(
        &self,
        squad_id: &SquadId,
        f: impl FnOnce(&mut SquadState) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let handle = self.handle(squad_id)?;
        let mut state = handle
            .lock()
            .map_err(|_| EngineError::Internal(format!("squad '{squad_id}' lock poisoned")))?;
        f(&mut state)
    }

    /// Snapshot of all squad handles, for the expiry sweep. The registry
    /// lock is dropped before any squad lock is taken.
    pub fn handles(&self) -> Vec<(SquadId, Arc<Mutex<SquadState>>)> {
        match self.squads.read() {
            Ok(squads) => squads
                .iter()
                .map(|(id, handle)| (id.clone(), Arc::clone(handle)))
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    fn handle(&self, squad_id: &SquadId) -> Result<Arc<Mutex<SquadState>>, EngineError> {
        let squads = self
            .squads
            .read()
            .map_err(|_| EngineError::Internal("squad registry lock poisoned".into()))?;
        squads
            .get(squad_id)
            .cloned()
            .ok_or_else(|| EngineError::SquadNotFound(squad_id.clone()))
    }
}

impl Default for SquadStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squad_domain::{ConsensusMode, MemberId, VoteChoice};

    fn store_with_squad() -> (SquadStore, SquadId) {
        let store = SquadStore::new();
        let squad = Squad::new("s", ConsensusMode::Majority, 300, MemberId::new("m0"));
        let id = store.insert(squad).unwrap();
        (store, id)
    }

    #[test]
    fn test_unknown_squad_is_not_found() {
        let store = SquadStore::new();
        let err = store
            .with_squad(&SquadId::new("nope"), |_| Ok(()))
            .unwrap_err();
        assert!(matches!(err, EngineError::SquadNotFound(_)));
    }

    #[test]
    fn test_versions_are_sequential() {
        let (store, id) = store_with_squad();
        store
            .with_squad(&id, |state| {
                for i in 1..=5u64 {
                    let entry = state.append_entry(
                        format!("fact {i}"),
                        "Ava",
                        ProposalOrigin::MemberNominated,
                        ProposalId::generate(),
                    );
                    assert_eq!(entry.version, i);
                }
                assert_eq!(state.current_version(), 5);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_record_vote_overwrites() {
        let (store, id) = store_with_squad();
        store
            .with_squad(&id, |state| {
                let pid = ProposalId::new("c1");
                let voter = MemberId::new("m1");
                state.record_vote(Vote::new(
                    pid.clone(),
                    voter.clone(),
                    "Ava",
                    VoteChoice::Approve,
                    false,
                ));
                state.record_vote(Vote::new(
                    pid.clone(),
                    voter.clone(),
                    "Ava",
                    VoteChoice::Reject,
                    false,
                ));

                let votes = state.votes_for(&pid);
                assert_eq!(votes.len(), 1);
                assert_eq!(votes[0].choice, VoteChoice::Reject);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_name_lookup_ignores_inactive() {
        let (store, id) = store_with_squad();
        store
            .with_squad(&id, |state| {
                let mut member = Member::new("Ava", "claude");
                member.is_active = false;
                state.members.push(member);
                assert!(state.find_active_by_name("Ava").is_none());

                state.members.push(Member::new("Ava", "gpt"));
                assert!(state.find_active_by_name("Ava").is_some());
                assert_eq!(state.active_member_count(), 1);
                Ok(())
            })
            .unwrap();
    }
}
