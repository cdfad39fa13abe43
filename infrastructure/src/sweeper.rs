//! Background expiry sweeper.
//!
//! Drives the engine's no-objection timeout: a recurring tokio task that
//! expires overdue pending proposals. Cancellation goes through a
//! `CancellationToken` so shutdown can stop the sweep cleanly.

use squad_application::OrchestrationEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Periodically expires overdue no-objection proposals.
pub struct ExpirySweeper {
    interval: Duration,
    cancel: CancellationToken,
}

impl ExpirySweeper {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            cancel: CancellationToken::new(),
        }
    }

    /// Token observed by the sweep loop; share it with a broader shutdown
    /// sequence if one exists.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Spawns the sweep loop on the current runtime.
    pub fn spawn(&self, engine: Arc<OrchestrationEngine>) -> JoinHandle<()> {
        let cancel = self.cancel.clone();
        let interval = self.interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("expiry sweeper stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        let expired = engine.sweep_expired();
                        if expired > 0 {
                            info!(expired, "expired overdue proposals");
                        }
                    }
                }
            }
        })
    }

    /// Signals the sweep loop to stop after its current pass.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::TracingAuditSink;
    use crate::credentials::InMemoryCredentialStore;
    use squad_application::EngineDefaults;
    use squad_domain::ConsensusMode;

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_expires_and_stops() {
        let engine = Arc::new(
            OrchestrationEngine::new(
                Arc::new(InMemoryCredentialStore::new()),
                Arc::new(TracingAuditSink::new()),
            )
            .with_defaults(EngineDefaults {
                consensus_mode: ConsensusMode::NoObjection,
                commit_timeout_seconds: 0,
            }),
        );
        let created = engine.create_squad("core", "Ava", "claude").await.unwrap();
        engine
            .propose_commit(&created.squad.id, "Ava", "Use Rust")
            .unwrap();

        let sweeper = ExpirySweeper::new(Duration::from_millis(10));
        let handle = sweeper.spawn(Arc::clone(&engine));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(engine
            .list_pending_commits(&created.squad.id)
            .unwrap()
            .is_empty());

        sweeper.stop();
        handle.await.unwrap();
    }
}
