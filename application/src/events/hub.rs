//! Event broadcast hub.
//!
//! Owned and injected by the engine, not a process-wide global;
//! subscriptions live as long as the engine instance. Fan-out is
//! synchronous and best-effort: a panicking subscriber is isolated so it
//! can neither block delivery to the others nor propagate back into the
//! publisher.

use super::event::EngineEvent;
use squad_domain::SquadId;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::warn;

/// Subscriber callback. Runs on the publishing thread, after the engine
/// has released the squad lock, so a slow subscriber delays other
/// subscribers but never unrelated mutations.
pub type Listener = Arc<dyn Fn(&EngineEvent) + Send + Sync>;

/// What a subscriber listens to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventScope {
    /// Events from one squad only.
    Squad(SquadId),
    /// Events from every squad.
    Global,
}

/// Handle returned by [`EventHub::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct HubInner {
    next_id: u64,
    squad: HashMap<SquadId, Vec<(SubscriptionId, Listener)>>,
    global: Vec<(SubscriptionId, Listener)>,
}

/// Registry of event listeners, squad-scoped and global.
pub struct EventHub {
    inner: Mutex<HubInner>,
}

impl EventHub {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HubInner {
                next_id: 0,
                squad: HashMap::new(),
                global: Vec::new(),
            }),
        }
    }

    /// Registers a listener for the given scope.
    pub fn subscribe(&self, scope: EventScope, listener: Listener) -> SubscriptionId {
        let mut inner = self.lock();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        match scope {
            EventScope::Squad(squad_id) => {
                inner.squad.entry(squad_id).or_default().push((id, listener));
            }
            EventScope::Global => inner.global.push((id, listener)),
        }
        id
    }

    /// Removes a listener. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut inner = self.lock();
        inner.global.retain(|(sid, _)| *sid != id);
        for listeners in inner.squad.values_mut() {
            listeners.retain(|(sid, _)| *sid != id);
        }
    }

    /// Delivers `event` to the squad's listeners and then the global
    /// ones, in registration order. Panics inside a listener are caught,
    /// logged, and skipped.
    pub fn publish(&self, event: &EngineEvent) {
        let listeners: Vec<Listener> = {
            let inner = self.lock();
            inner
                .squad
                .get(&event.squad_id)
                .into_iter()
                .flatten()
                .chain(inner.global.iter())
                .map(|(_, l)| Arc::clone(l))
                .collect()
        };

        for listener in listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                warn!(
                    event = %event.kind,
                    squad_id = %event.squad_id,
                    "event listener panicked; skipping it"
                );
            }
        }
    }

    /// Number of listeners that would receive an event for `squad_id`.
    pub fn listener_count(&self, squad_id: &SquadId) -> usize {
        let inner = self.lock();
        inner.squad.get(squad_id).map_or(0, Vec::len) + inner.global.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HubInner> {
        // A panicking listener runs outside this lock, so poisoning can
        // only come from a bug in the hub itself; recover rather than
        // take every publisher down.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}
