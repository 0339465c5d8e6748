//! Learning hyperparameters and loop timing.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{check_non_negative, check_positive, check_unit};
use crate::RlError;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LearningConfig {
    /// Learning rate.
    pub alpha: f32,
    /// Discount factor.
    pub gamma: f32,
    /// Initial exploration rate.
    pub epsilon: f32,
    /// Linear epsilon decay per second (0 disables decay).
    pub epsilon_decay_per_second: f32,
    /// Exploration never decays below this.
    pub epsilon_floor: f32,
    /// Minimum time a movement action is held before switching to another.
    pub min_action_duration: f32,
    /// Seconds between decisions (0 decides on every tick).
    pub decision_interval: f32,
    /// Seconds between combat stat refreshes from the world.
    pub stats_poll_interval: f32,
    /// Trailing window for damage / healing throughput.
    pub throughput_window: f32,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            gamma: 0.95,
            epsilon: 0.2,
            epsilon_decay_per_second: 0.0,
            epsilon_floor: 0.01,
            min_action_duration: 0.3,
            decision_interval: 0.0,
            stats_poll_interval: 1.0,
            throughput_window: 5.0,
        }
    }
}

impl LearningConfig {
    pub fn validate(&self) -> Result<(), RlError> {
        check_unit("alpha", self.alpha)?;
        check_unit("gamma", self.gamma)?;
        check_unit("epsilon", self.epsilon)?;
        check_unit("epsilon_floor", self.epsilon_floor)?;
        check_non_negative("epsilon_decay_per_second", self.epsilon_decay_per_second)?;
        check_non_negative("min_action_duration", self.min_action_duration)?;
        check_non_negative("decision_interval", self.decision_interval)?;
        check_non_negative("stats_poll_interval", self.stats_poll_interval)?;
        check_positive("throughput_window", self.throughput_window)?;
        Ok(())
    }

    /// Fully greedy, no action smoothing. Handy for deterministic harnesses.
    pub fn greedy() -> Self {
        Self {
            epsilon: 0.0,
            min_action_duration: 0.0,
            ..Self::default()
        }
    }
}
