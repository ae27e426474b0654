//! Experiment configuration.
//!
//! One structure carries every constant of a run. The runner derives the
//! signaling-off and signaling-on runs from the same value, changing only
//! [`ExperimentConfig::signaling`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WalkinError};
use crate::types::SignalingMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// How long an actor holds the resource once inside (milliseconds)
    pub time_in_resource_ms: u64,

    /// Delay after any abstention or failed attempt (milliseconds)
    pub backoff_ms: u64,

    /// How long each actor keeps deciding (milliseconds)
    pub run_time_ms: u64,

    /// Size of the actor pool
    pub actor_count: usize,

    /// Chance that an actor locks the door after getting in
    pub lock_probability: f64,

    /// Chance of knocking when the door carries no markings
    pub knock_probability_unsignaled: f64,

    /// Chance of knocking when the door reads "vacant"
    pub knock_probability_signaled: f64,

    /// Scales the urge probability, weighted by time since last use
    pub base_urge_probability: f64,

    /// No new urge arises this soon after a use (milliseconds)
    pub refractory_ms: u64,

    /// Idle step between urge evaluations; zero busy-polls (milliseconds)
    pub poll_interval_ms: u64,

    pub signaling: SignalingMode,

    /// Base seed for the actors' random sources; random when absent
    pub seed: Option<u64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            time_in_resource_ms: 200,
            backoff_ms: 900,
            run_time_ms: 10_000,
            actor_count: 10,
            lock_probability: 0.8,
            knock_probability_unsignaled: 0.7,
            knock_probability_signaled: 0.1,
            base_urge_probability: 0.2,
            refractory_ms: 2_000,
            poll_interval_ms: 0,
            signaling: SignalingMode::Off,
            seed: None,
        }
    }
}

impl ExperimentConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Same configuration with a different signaling mode.
    pub fn with_signaling(&self, signaling: SignalingMode) -> Self {
        Self {
            signaling,
            ..self.clone()
        }
    }

    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self.clone()
        }
    }

    pub fn time_in_resource(&self) -> Duration {
        Duration::from_millis(self.time_in_resource_ms)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    pub fn run_time(&self) -> Duration {
        Duration::from_millis(self.run_time_ms)
    }

    pub fn refractory(&self) -> Duration {
        Duration::from_millis(self.refractory_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.actor_count == 0 {
            return Err(WalkinError::InvalidConfig(
                "actor_count must be greater than 0".to_string(),
            ));
        }
        if self.run_time_ms == 0 {
            return Err(WalkinError::InvalidConfig(
                "run_time_ms must be greater than 0".to_string(),
            ));
        }

        let probabilities = [
            ("lock_probability", self.lock_probability),
            ("knock_probability_unsignaled", self.knock_probability_unsignaled),
            ("knock_probability_signaled", self.knock_probability_signaled),
            ("base_urge_probability", self.base_urge_probability),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(WalkinError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        if self.knock_probability_unsignaled <= self.knock_probability_signaled {
            return Err(WalkinError::InvalidConfig(format!(
                "knock_probability_unsignaled ({}) must be higher than knock_probability_signaled ({})",
                self.knock_probability_unsignaled, self.knock_probability_signaled
            )));
        }

        Ok(())
    }
}
