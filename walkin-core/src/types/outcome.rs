use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};
use std::time::Duration;

use super::{ActorId, SignalingMode};

/// Aggregate of one experiment run: walk-in conflicts and successful uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPair {
    pub conflicts: u64,
    pub uses: u64,
}

impl ResultPair {
    pub fn new(conflicts: u64, uses: u64) -> Self {
        Self { conflicts, uses }
    }
}

impl std::fmt::Display for ResultPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.conflicts, self.uses)
    }
}

/// Snapshot of one actor's counters.
///
/// Every acquisition attempt ends as exactly one of a use, a walk-in
/// conflict or a locked failure, so
/// `attempts == uses + conflicts + locked_failures`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorStats {
    /// Calls to `try_acquire`
    pub attempts: u64,
    /// Successful acquisitions
    pub uses: u64,
    /// Failed attempts while the door read unlocked
    pub conflicts: u64,
    /// Failed attempts while the door read locked
    pub locked_failures: u64,
    /// Times the knock decision was taken
    pub knock_decisions: u64,
    /// Times the actor knocked
    pub knocks: u64,
    /// Abstentions because the door sign read occupied
    pub sign_abstentions: u64,
    /// Abstentions because a knock was answered
    pub knock_abstentions: u64,
}

impl ActorStats {
    pub fn result(&self) -> ResultPair {
        ResultPair::new(self.conflicts, self.uses)
    }

    /// Observed fraction of knock decisions that ended in a knock.
    pub fn knock_rate(&self) -> Option<f64> {
        if self.knock_decisions == 0 {
            None
        } else {
            Some(self.knocks as f64 / self.knock_decisions as f64)
        }
    }
}

impl Add for ActorStats {
    type Output = ActorStats;

    fn add(mut self, rhs: ActorStats) -> ActorStats {
        self += rhs;
        self
    }
}

impl AddAssign for ActorStats {
    fn add_assign(&mut self, rhs: ActorStats) {
        self.attempts += rhs.attempts;
        self.uses += rhs.uses;
        self.conflicts += rhs.conflicts;
        self.locked_failures += rhs.locked_failures;
        self.knock_decisions += rhs.knock_decisions;
        self.knocks += rhs.knocks;
        self.sign_abstentions += rhs.sign_abstentions;
        self.knock_abstentions += rhs.knock_abstentions;
    }
}

impl std::iter::Sum for ActorStats {
    fn sum<I: Iterator<Item = ActorStats>>(iter: I) -> Self {
        iter.fold(ActorStats::default(), Add::add)
    }
}

/// How an actor's loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Ran until its run duration elapsed
    Completed,
    /// A hold or backoff was interrupted from outside
    Interrupted,
    /// The actor's task panicked or was cancelled by the runtime
    Aborted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorReport {
    pub id: ActorId,
    pub stats: ActorStats,
    pub termination: Termination,
}

/// Everything the orchestrator learned from one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentOutcome {
    pub run_id: String,
    pub seed: u64,
    pub signaling: SignalingMode,
    pub result: ResultPair,
    pub totals: ActorStats,
    pub actors: Vec<ActorReport>,
    /// Highest number of simultaneous holders seen on the resource
    pub peak_occupancy: usize,
    pub elapsed: Duration,
}

impl ExperimentOutcome {
    pub fn interrupted_actors(&self) -> usize {
        self.actors
            .iter()
            .filter(|a| a.termination != Termination::Completed)
            .count()
    }
}
