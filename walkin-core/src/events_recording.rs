use crate::events::{ActorEvent, EventKind, EventSink};
use crate::types::ActorId;
use std::sync::{Mutex, MutexGuard};

/// Keeps every event in arrival order. Used to inspect runs after the fact.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ActorEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ActorEvent> {
        self.guard().clone()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.guard().iter().filter(|e| e.kind == kind).count()
    }

    /// Events of one actor, in the order that actor produced them.
    pub fn for_actor(&self, actor: ActorId) -> Vec<ActorEvent> {
        self.guard()
            .iter()
            .filter(|e| e.actor == actor)
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<ActorEvent>> {
        // A panicking recorder cannot leave the Vec half-written.
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: &ActorEvent) {
        self.guard().push(*event);
    }
}
