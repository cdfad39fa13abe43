//! Event broadcasting: the hub and the event payloads it fans out.

pub mod event;
pub mod hub;

pub use event::{EngineEvent, EventKind};
pub use hub::{EventHub, EventScope, Listener, SubscriptionId};
