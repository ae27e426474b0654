//! One simulated person and their decision loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::decision::DecisionEngine;
use crate::error::Result;
use crate::events::EventKind;
use crate::interrupt::Interrupt;
use crate::state::RunContext;
use crate::types::{ActorId, ActorStats, FailedAttempt, Termination};

/// Counters of one actor. Only the owning actor writes them; the
/// orchestrator reads them after the actor's task has ended, however it
/// ended.
#[derive(Debug, Default)]
pub struct ActorCounters {
    attempts: AtomicU64,
    uses: AtomicU64,
    conflicts: AtomicU64,
    locked_failures: AtomicU64,
    knock_decisions: AtomicU64,
    knocks: AtomicU64,
    sign_abstentions: AtomicU64,
    knock_abstentions: AtomicU64,
}

impl ActorCounters {
    pub fn snapshot(&self) -> ActorStats {
        ActorStats {
            attempts: self.attempts.load(Ordering::Relaxed),
            uses: self.uses.load(Ordering::Relaxed),
            conflicts: self.conflicts.load(Ordering::Relaxed),
            locked_failures: self.locked_failures.load(Ordering::Relaxed),
            knock_decisions: self.knock_decisions.load(Ordering::Relaxed),
            knocks: self.knocks.load(Ordering::Relaxed),
            sign_abstentions: self.sign_abstentions.load(Ordering::Relaxed),
            knock_abstentions: self.knock_abstentions.load(Ordering::Relaxed),
        }
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

pub struct Actor {
    id: ActorId,
    ctx: Arc<RunContext>,
    rng: StdRng,
    interrupt: Interrupt,
    /// Survives failed attempts; cleared only by a completed use
    pending_urge: bool,
    last_use: Option<Instant>,
    counters: Arc<ActorCounters>,
}

impl Actor {
    pub fn new(id: ActorId, ctx: Arc<RunContext>, seed: u64, interrupt: Interrupt) -> Self {
        Self {
            id,
            ctx,
            rng: StdRng::seed_from_u64(seed),
            interrupt,
            pending_urge: false,
            last_use: None,
            counters: Arc::new(ActorCounters::default()),
        }
    }

    pub fn counters(&self) -> Arc<ActorCounters> {
        Arc::clone(&self.counters)
    }

    pub fn has_pending_urge(&self) -> bool {
        self.pending_urge
    }

    pub fn last_use(&self) -> Option<Instant> {
        self.last_use
    }

    /// Runs the decision loop until the configured run time has elapsed,
    /// measured from this call. The deadline is checked between iterations
    /// only, so a hold in progress always completes.
    pub async fn run(mut self) -> Termination {
        let started = Instant::now();
        let run_time = self.ctx.config.run_time();

        let termination = loop {
            if started.elapsed() > run_time {
                break Termination::Completed;
            }
            if let Err(err) = self.step().await {
                tracing::debug!(actor = self.id, error = %err, "Actor stopped early");
                break Termination::Interrupted;
            }
        };

        match termination {
            Termination::Completed => self.emit(EventKind::Finished),
            _ => self.emit(EventKind::Interrupted),
        }
        termination
    }

    /// One loop iteration: evaluate the urge, then either visit or idle.
    pub(crate) async fn step(&mut self) -> Result<()> {
        let since_last_use = self.last_use.map(|at| at.elapsed());
        let wants = DecisionEngine::will_use(
            &mut self.rng,
            &self.ctx.config,
            self.pending_urge,
            since_last_use,
        );

        if wants {
            self.visit().await
        } else {
            self.idle().await
        }
    }

    pub(crate) async fn visit(&mut self) -> Result<()> {
        let ctx = Arc::clone(&self.ctx);
        let config = &ctx.config;
        let resource = &ctx.resource;
        let signaling = ctx.signaling();

        self.pending_urge = true;
        self.emit(EventKind::WantsToUse);

        if signaling.is_on() && resource.is_locked() {
            ActorCounters::bump(&self.counters.sign_abstentions);
            self.emit(EventKind::SignAbstained);
            return self.interrupt.sleep(config.backoff()).await;
        }

        let knocked = DecisionEngine::will_knock(&mut self.rng, config, signaling);
        ActorCounters::bump(&self.counters.knock_decisions);
        if knocked {
            ActorCounters::bump(&self.counters.knocks);
        }

        // The availability check and the attempt below are deliberately not
        // atomic with each other.
        if knocked && !resource.is_available() {
            ActorCounters::bump(&self.counters.knock_abstentions);
            self.emit(EventKind::KnockAnswered);
            return self.interrupt.sleep(config.backoff()).await;
        }

        ActorCounters::bump(&self.counters.attempts);
        match resource.try_acquire(&mut self.rng) {
            Some(occupancy) => {
                ActorCounters::bump(&self.counters.uses);
                if occupancy.locked_door() {
                    self.emit(EventKind::EnteredLocked);
                } else {
                    self.emit(EventKind::EnteredUnlocked);
                }

                // On interrupt the early return drops `occupancy`, which
                // vacates the resource.
                self.interrupt.sleep(config.time_in_resource()).await?;
                occupancy.release();

                self.pending_urge = false;
                self.last_use = Some(Instant::now());
                self.emit(EventKind::Left);
                Ok(())
            }
            None => {
                match DecisionEngine::classify_failure(resource.is_locked()) {
                    FailedAttempt::WalkIn => {
                        ActorCounters::bump(&self.counters.conflicts);
                        self.emit(EventKind::WalkedIn);
                    }
                    FailedAttempt::Locked => {
                        ActorCounters::bump(&self.counters.locked_failures);
                        self.emit(EventKind::FoundLocked);
                    }
                }
                self.interrupt.sleep(config.backoff()).await
            }
        }
    }

    /// Nothing to do this iteration. A zero poll interval busy-polls,
    /// yielding so that other actors on the same worker keep running.
    async fn idle(&mut self) -> Result<()> {
        let poll = self.ctx.config.poll_interval();
        if poll.is_zero() {
            tokio::task::yield_now().await;
            Ok(())
        } else {
            self.interrupt.sleep(poll).await
        }
    }

    fn emit(&self, kind: EventKind) {
        self.ctx.emit(self.id, kind);
    }
}
