//! # walkin-core
//!
//! Contention model for the walk-in experiment: a pool of concurrent actors
//! competes for one exclusive resource whose "locked" sign is observed
//! without synchronization, and the runs count how often an actor walks in
//! on an occupant with and without visible occupancy signaling.

pub mod actor;
pub mod comparison;
pub mod config;
pub mod decision;
pub mod error;
pub mod events;
#[path = "events_recording.rs"]
pub mod events_recording;
pub mod experiment;
pub mod interrupt;
pub mod resource;
pub mod state;
pub mod types;

pub use comparison::{Comparison, ComparisonReport};
pub use config::ExperimentConfig;
pub use error::{Result, WalkinError};
pub use experiment::{Experiment, run_experiment};
pub use types::{ResultPair, SignalingMode};

#[cfg(test)]
mod comparison_test;
#[cfg(test)]
mod config_test;
#[cfg(test)]
mod resource_test;
