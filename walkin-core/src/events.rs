use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::{ActorId, ExperimentOutcome, SignalingMode};

/// State transitions an actor reports while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Urge is pending and the actor heads for the door
    WantsToUse,
    /// The sign read occupied, so the actor did not try
    SignAbstained,
    /// Knocked and was answered
    KnockAnswered,
    /// Got in and locked the door
    EnteredLocked,
    /// Got in but forgot to lock
    EnteredUnlocked,
    /// Left after the usage period
    Left,
    /// Failed attempt while the door read unlocked
    WalkedIn,
    /// Failed attempt against a locked door
    FoundLocked,
    /// Run duration elapsed
    Finished,
    /// A suspension was interrupted and the loop ended early
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorEvent {
    pub actor: ActorId,
    /// Time since the experiment started
    pub at: Duration,
    pub kind: EventKind,
}

/// Receives actor events. Called concurrently from every actor task.
pub trait EventSink: Send + Sync {
    fn record(&self, event: &ActorEvent);

    /// Called once before any actor of a run starts.
    fn experiment_started(&self, _run_id: &str, _signaling: SignalingMode) {}

    /// Called once after every actor of a run has been joined.
    fn experiment_finished(&self, _outcome: &ExperimentOutcome) {}
}

/// Forwards events to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &ActorEvent) {
        tracing::debug!(
            actor = event.actor,
            at_ms = event.at.as_millis() as u64,
            kind = ?event.kind,
            "Actor event"
        );
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: &ActorEvent) {}
}
