//! Paired comparison of the two signaling modes.
//!
//! Each trial runs signaling off and then on with the same configuration and
//! the same seed, so every actor consumes an identical random stream in both
//! runs and the two results can be compared pairwise.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::ExperimentConfig;
use crate::error::{Result, WalkinError};
use crate::events::{EventSink, TracingSink};
use crate::experiment::Experiment;
use crate::interrupt::InterruptHandle;
use crate::types::{ActorStats, ExperimentOutcome, ResultPair, SignalingMode};

/// The parts of an outcome kept for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub seed: u64,
    pub signaling: SignalingMode,
    pub result: ResultPair,
    pub totals: ActorStats,
    pub peak_occupancy: usize,
    pub interrupted_actors: usize,
}

impl From<&ExperimentOutcome> for RunSummary {
    fn from(outcome: &ExperimentOutcome) -> Self {
        Self {
            run_id: outcome.run_id.clone(),
            seed: outcome.seed,
            signaling: outcome.signaling,
            result: outcome.result,
            totals: outcome.totals,
            peak_occupancy: outcome.peak_occupancy,
            interrupted_actors: outcome.interrupted_actors(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialPair {
    pub trial: usize,
    pub seed: u64,
    pub unsignaled: RunSummary,
    pub signaled: RunSummary,
}

impl TrialPair {
    /// Signaled minus unsignaled conflicts; negative when signaling helped.
    pub fn conflict_difference(&self) -> i64 {
        self.signaled.result.conflicts as i64 - self.unsignaled.result.conflicts as i64
    }
}

/// Statistics for one signaling mode across all trials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeSummary {
    pub signaling: SignalingMode,
    pub trials: usize,
    pub mean_conflicts: f64,
    /// Sample standard deviation; zero with fewer than two trials
    pub stddev_conflicts: f64,
    pub mean_uses: f64,
    /// Total conflicts over total uses; zero when nothing was used
    pub conflicts_per_use: f64,
    pub totals: ActorStats,
}

impl ModeSummary {
    fn from_runs<'a>(signaling: SignalingMode, runs: impl Iterator<Item = &'a RunSummary>) -> Self {
        let runs: Vec<&RunSummary> = runs.collect();
        let conflicts: Vec<f64> = runs.iter().map(|r| r.result.conflicts as f64).collect();
        let uses: Vec<f64> = runs.iter().map(|r| r.result.uses as f64).collect();
        let totals: ActorStats = runs.iter().map(|r| r.totals).sum();

        let conflicts_per_use = if totals.uses == 0 {
            0.0
        } else {
            totals.conflicts as f64 / totals.uses as f64
        };

        Self {
            signaling,
            trials: runs.len(),
            mean_conflicts: mean(&conflicts),
            stddev_conflicts: sample_stddev(&conflicts),
            mean_uses: mean(&uses),
            conflicts_per_use,
            totals,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub config: ExperimentConfig,
    pub base_seed: u64,
    pub trials: Vec<TrialPair>,
    pub unsignaled: ModeSummary,
    pub signaled: ModeSummary,
    /// Mean of the per-trial signaled minus unsignaled conflict counts
    pub mean_conflict_difference: f64,
    /// True when an interrupt cut the comparison short
    pub interrupted: bool,
}

impl ComparisonReport {
    fn from_trials(
        config: ExperimentConfig,
        base_seed: u64,
        trials: Vec<TrialPair>,
        interrupted: bool,
    ) -> Self {
        let unsignaled = ModeSummary::from_runs(SignalingMode::Off, trials.iter().map(|t| &t.unsignaled));
        let signaled = ModeSummary::from_runs(SignalingMode::On, trials.iter().map(|t| &t.signaled));
        let differences: Vec<f64> = trials.iter().map(|t| t.conflict_difference() as f64).collect();

        Self {
            config,
            base_seed,
            mean_conflict_difference: mean(&differences),
            trials,
            unsignaled,
            signaled,
            interrupted,
        }
    }

    /// Whether signaling lowered the mean conflict count in this sample.
    pub fn signaling_reduces_conflicts(&self) -> bool {
        self.signaled.mean_conflicts < self.unsignaled.mean_conflicts
    }
}

/// Runs signaling-off / signaling-on pairs.
pub struct Comparison {
    config: ExperimentConfig,
    trials: usize,
    sink: Arc<dyn EventSink>,
    interrupts: InterruptHandle,
}

impl Comparison {
    pub fn new(config: ExperimentConfig) -> Self {
        let interrupts = InterruptHandle::new(config.actor_count);
        Self {
            config,
            trials: 1,
            sink: Arc::new(TracingSink),
            interrupts,
        }
    }

    pub fn trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Interrupting through this handle stops the running experiment's
    /// actors and prevents further trials from starting.
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.interrupts.clone()
    }

    pub async fn run(&self) -> Result<ComparisonReport> {
        self.config.validate()?;
        if self.trials == 0 {
            return Err(WalkinError::InvalidConfig(
                "trials must be greater than 0".to_string(),
            ));
        }

        let base_seed = self.config.seed.unwrap_or_else(rand::random);
        let mut trials = Vec::with_capacity(self.trials);

        for trial in 0..self.trials {
            if self.interrupts.is_interrupted() {
                tracing::warn!(completed = trials.len(), requested = self.trials, "Comparison interrupted");
                break;
            }

            let seed = base_seed.wrapping_add(trial as u64);
            let unsignaled = self.run_once(seed, SignalingMode::Off).await?;
            if self.interrupts.is_interrupted() {
                // An unpaired run says nothing about signaling; drop it.
                tracing::warn!(trial, seed, "Comparison interrupted mid-trial, dropping unpaired run");
                break;
            }
            let signaled = self.run_once(seed, SignalingMode::On).await?;

            tracing::info!(
                trial,
                seed,
                unsignaled = %unsignaled.result,
                signaled = %signaled.result,
                "Trial complete"
            );

            trials.push(TrialPair {
                trial,
                seed,
                unsignaled,
                signaled,
            });
        }

        Ok(ComparisonReport::from_trials(
            self.config.clone(),
            base_seed,
            trials,
            self.interrupts.is_interrupted(),
        ))
    }

    async fn run_once(&self, seed: u64, signaling: SignalingMode) -> Result<RunSummary> {
        let config = self.config.with_signaling(signaling).with_seed(seed);
        let experiment = Experiment::with_interrupts(config, Arc::clone(&self.sink), self.interrupts.clone())?;
        let outcome = experiment.run().await;
        Ok(RunSummary::from(&outcome))
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
