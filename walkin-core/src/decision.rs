use std::time::Duration;

use rand::Rng;

use crate::config::ExperimentConfig;
use crate::types::{FailedAttempt, SignalingMode};

/// Pure probability rules behind an actor's choices.
///
/// Holds no state; every random draw comes from the caller's source so a
/// seeded actor replays the same decision stream.
pub struct DecisionEngine;

impl DecisionEngine {
    /// Chance that an urge arises now.
    ///
    /// `since_last_use` is `None` for an actor that has not used the resource
    /// yet, which saturates the probability.
    pub fn urge_probability(config: &ExperimentConfig, since_last_use: Option<Duration>) -> f64 {
        let elapsed = match since_last_use {
            None => return 1.0,
            Some(elapsed) => elapsed,
        };

        if elapsed < config.refractory() {
            return 0.0;
        }

        let weighted = config.base_urge_probability * elapsed.as_millis() as f64
            / config.run_time_ms as f64;
        weighted.min(1.0)
    }

    /// An unresolved urge never goes away; otherwise roll for a new one.
    pub fn will_use<R: Rng + ?Sized>(
        rng: &mut R,
        config: &ExperimentConfig,
        pending_urge: bool,
        since_last_use: Option<Duration>,
    ) -> bool {
        if pending_urge {
            return true;
        }
        Self::roll(rng, Self::urge_probability(config, since_last_use))
    }

    pub fn knock_probability(config: &ExperimentConfig, signaling: SignalingMode) -> f64 {
        match signaling {
            SignalingMode::On => config.knock_probability_signaled,
            SignalingMode::Off => config.knock_probability_unsignaled,
        }
    }

    pub fn will_knock<R: Rng + ?Sized>(
        rng: &mut R,
        config: &ExperimentConfig,
        signaling: SignalingMode,
    ) -> bool {
        Self::roll(rng, Self::knock_probability(config, signaling))
    }

    /// Whether the door gets locked by someone who just got in.
    pub fn will_lock<R: Rng + ?Sized>(rng: &mut R, lock_probability: f64) -> bool {
        Self::roll(rng, lock_probability)
    }

    /// A failed attempt is a walk-in exactly when the door reads unlocked
    /// at the moment of the check.
    pub fn classify_failure(locked_now: bool) -> FailedAttempt {
        if locked_now {
            FailedAttempt::Locked
        } else {
            FailedAttempt::WalkIn
        }
    }

    /// Bernoulli draw; probabilities outside `[0, 1]` are clamped.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
        if probability.is_nan() {
            return false;
        }
        rng.gen_bool(probability.clamp(0.0, 1.0))
    }

    /// Seed for one actor's random source, derived from the run's base seed.
    ///
    /// Both signaling configurations of a trial share the base seed, so each
    /// actor consumes the same stream in both runs.
    pub fn actor_seed(base_seed: u64, actor_id: usize) -> u64 {
        // splitmix64 finalizer keeps neighbouring ids far apart
        let mut z = base_seed.wrapping_add((actor_id as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}
