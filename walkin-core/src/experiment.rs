//! Experiment orchestration: one run of the actor pool against a fresh
//! resource.

use std::sync::Arc;

use nanoid::nanoid;

use crate::actor::Actor;
use crate::config::ExperimentConfig;
use crate::decision::DecisionEngine;
use crate::error::{Result, WalkinError};
use crate::events::{EventSink, TracingSink};
use crate::interrupt::{Interrupt, InterruptHandle};
use crate::state::RunContext;
use crate::types::{ActorReport, ActorStats, ExperimentOutcome, ResultPair, Termination};

/// A validated, ready-to-start run.
pub struct Experiment {
    config: ExperimentConfig,
    seed: u64,
    run_id: String,
    sink: Arc<dyn EventSink>,
    interrupts: InterruptHandle,
}

impl Experiment {
    pub fn new(config: ExperimentConfig, sink: Arc<dyn EventSink>) -> Result<Self> {
        let interrupts = InterruptHandle::new(config.actor_count);
        Self::with_interrupts(config, sink, interrupts)
    }

    /// Uses an existing interrupt handle, so one handle can span several
    /// consecutive runs.
    pub fn with_interrupts(
        config: ExperimentConfig,
        sink: Arc<dyn EventSink>,
        interrupts: InterruptHandle,
    ) -> Result<Self> {
        config.validate()?;
        if interrupts.len() != config.actor_count {
            return Err(WalkinError::InterruptHandleMismatch {
                handle: interrupts.len(),
                actors: config.actor_count,
            });
        }

        let seed = config.seed.unwrap_or_else(rand::random);
        Ok(Self {
            config,
            seed,
            run_id: nanoid!(10),
            sink,
            interrupts,
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.interrupts.clone()
    }

    /// Starts every actor at once, waits for all of them and sums their
    /// counters. Actors that ended early still contribute what they counted.
    pub async fn run(self) -> ExperimentOutcome {
        let ctx = Arc::new(RunContext::new(self.config.clone(), Arc::clone(&self.sink)));
        let signaling = ctx.signaling();

        tracing::info!(
            run_id = %self.run_id,
            seed = self.seed,
            signaling = %signaling,
            actors = self.config.actor_count,
            "Begin experiment"
        );
        self.sink.experiment_started(&self.run_id, signaling);

        let mut running = Vec::with_capacity(self.config.actor_count);
        for id in 0..self.config.actor_count {
            let interrupt = self
                .interrupts
                .subscribe(id)
                .unwrap_or_else(Interrupt::never);
            let actor = Actor::new(
                id,
                Arc::clone(&ctx),
                DecisionEngine::actor_seed(self.seed, id),
                interrupt,
            );
            let counters = actor.counters();
            running.push((id, counters, tokio::spawn(actor.run())));
        }

        let mut actors = Vec::with_capacity(running.len());
        for (id, counters, handle) in running {
            let termination = match handle.await {
                Ok(termination) => termination,
                Err(err) => {
                    tracing::warn!(run_id = %self.run_id, actor = id, error = %err, "Actor task aborted");
                    Termination::Aborted
                }
            };
            actors.push(ActorReport {
                id,
                stats: counters.snapshot(),
                termination,
            });
        }

        let totals: ActorStats = actors.iter().map(|a| a.stats).sum();
        let outcome = ExperimentOutcome {
            run_id: self.run_id,
            seed: self.seed,
            signaling,
            result: totals.result(),
            totals,
            actors,
            peak_occupancy: ctx.resource.peak_occupancy(),
            elapsed: ctx.elapsed(),
        };

        tracing::info!(
            run_id = %outcome.run_id,
            signaling = %signaling,
            conflicts = outcome.result.conflicts,
            uses = outcome.result.uses,
            interrupted = outcome.interrupted_actors(),
            "End experiment"
        );
        self.sink.experiment_finished(&outcome);

        outcome
    }
}

/// Runs one experiment with `config` and returns `(conflicts, uses)`.
pub async fn run_experiment(config: &ExperimentConfig) -> Result<ResultPair> {
    let experiment = Experiment::new(config.clone(), Arc::new(TracingSink))?;
    Ok(experiment.run().await.result)
}
