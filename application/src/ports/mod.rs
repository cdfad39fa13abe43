//! Port definitions (interfaces for external collaborators)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod audit_sink;
pub mod auth_gate;
pub mod credential_store;
pub mod rate_limiter;
