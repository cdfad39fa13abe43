//! Rate limiter port.
//!
//! Consulted by transport adapters before costly operations (proposing,
//! voting). The engine core never rate-limits; placing the check here
//! keeps the consensus path deterministic.

use async_trait::async_trait;

/// Decides whether an identity may perform an action right now, consuming
/// budget when it may.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Returns `true` when the action is allowed. A `false` is not an
    /// error; adapters translate it to their own throttling response.
    async fn check_and_consume(&self, action: &str, identity: &str) -> bool;
}
