//! Application layer for squad-orchestrator.
//!
//! Owns the use-case surface: the [`engine::OrchestrationEngine`] facade,
//! the in-memory [`store`] with per-squad locking, the [`events`] hub, and
//! the [`ports`] that infrastructure adapters implement.

pub mod engine;
pub mod events;
pub mod ports;
pub mod store;

pub use engine::{
    ContextView, EngineDefaults, JoinOutcome, OrchestrationEngine, PendingProposal, SquadCreated,
    SquadStatus, VoteOutcome,
};
pub use events::{EngineEvent, EventHub, EventKind, EventScope, Listener, SubscriptionId};
pub use ports::audit_sink::{audit_events, AuditError, AuditSink};
pub use ports::auth_gate::{AuthError, AuthGate, AuthIdentity, Role};
pub use ports::credential_store::{CredentialError, CredentialStore};
pub use ports::rate_limiter::RateLimiter;
