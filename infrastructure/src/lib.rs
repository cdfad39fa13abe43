//! Infrastructure layer for squad-orchestrator.
//!
//! Adapters behind the application ports (auth, credentials, audit, rate
//! limiting), figment-based configuration loading, and the background
//! expiry sweeper.

pub mod audit;
pub mod auth;
pub mod config;
pub mod credentials;
pub mod limiter;
pub mod sweeper;

pub use audit::TracingAuditSink;
pub use auth::StaticAuthGate;
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use credentials::InMemoryCredentialStore;
pub use limiter::FixedWindowRateLimiter;
pub use sweeper::ExpirySweeper;
