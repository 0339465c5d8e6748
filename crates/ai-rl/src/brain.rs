//! Linear Q-learning brain.
//!
//! `Q(s, a) = Σ_f w[a][f] * f(s)` with one weight row per action over a shared
//! feature set. Action selection is epsilon-greedy with ties broken by
//! [`CombatAction`] declaration order; learning is TD(0).

use ai_core::DeterministicRng;

use crate::action::CombatAction;
use crate::features::FeatureVector;
use crate::observation::Observation;
use crate::weights::WeightTable;

/// Outcome of one epsilon-greedy draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub action: CombatAction,
    /// True when the action came from the random branch.
    pub explored: bool,
    /// Q-value of the returned action in the observed state.
    pub q: f32,
}

/// Bookkeeping from one TD(0) step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TdUpdate {
    pub q_old: f32,
    pub target: f32,
    pub td_error: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QLearningBrain {
    weights: WeightTable,
}

impl QLearningBrain {
    pub fn new(weights: WeightTable) -> Self {
        Self { weights }
    }

    /// A brain with a freshly seeded (noisy, biased) table.
    pub fn fresh(rng: &mut impl DeterministicRng) -> Self {
        Self::new(WeightTable::seeded(rng))
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    pub fn into_weights(self) -> WeightTable {
        self.weights
    }

    pub fn q_value(&self, obs: &Observation, action: CombatAction) -> f32 {
        self.weights.q_value(action, &FeatureVector::from(obs))
    }

    pub fn q_values(&self, obs: &Observation) -> [f32; CombatAction::COUNT] {
        let x = FeatureVector::from(obs);
        CombatAction::ALL.map(|a| self.weights.q_value(a, &x))
    }

    /// Arg-max over all actions; the first action reaching the max wins.
    pub fn greedy_action(&self, obs: &Observation) -> (CombatAction, f32) {
        let q = self.q_values(obs);
        let mut best = CombatAction::MoveTowardTarget;
        let mut best_q = -f32::MAX;
        for action in CombatAction::ALL {
            if q[action.index()] > best_q {
                best = action;
                best_q = q[action.index()];
            }
        }
        (best, best_q)
    }

    fn max_q(&self, obs: &Observation) -> f32 {
        self.greedy_action(obs).1
    }

    pub fn select_action(
        &self,
        obs: &Observation,
        epsilon: f32,
        rng: &mut impl DeterministicRng,
    ) -> Selection {
        if rng.next_f32_unit() < epsilon {
            let action = CombatAction::from_index(rng.next_index(CombatAction::COUNT))
                .unwrap_or(CombatAction::MoveTowardTarget);
            return Selection {
                action,
                explored: true,
                q: self.q_value(obs, action),
            };
        }

        let (action, q) = self.greedy_action(obs);
        Selection {
            action,
            explored: false,
            q,
        }
    }

    /// One TD(0) step for the transition `(s, a, r, s')`.
    ///
    /// A non-finite TD error, or a step that would push a weight to a
    /// non-finite value, leaves the weights untouched.
    pub fn update(
        &mut self,
        prev: &Observation,
        action: CombatAction,
        reward: f32,
        next: &Observation,
        alpha: f32,
        gamma: f32,
    ) -> TdUpdate {
        let x = FeatureVector::from(prev);
        let q_old = self.weights.q_value(action, &x);
        let target = reward + gamma * self.max_q(next);
        let td_error = target - q_old;

        let applied =
            td_error.is_finite() && self.weights.nudge(action, &x, alpha * td_error);
        if !applied {
            tracing::warn!(%action, reward, q_old, td_error, "non-finite td update; skipped");
        }

        TdUpdate {
            q_old,
            target,
            td_error,
        }
    }
}

/// Epsilon with linear per-second decay and a floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exploration {
    pub epsilon: f32,
    pub decay_per_second: f32,
    pub floor: f32,
}

impl Exploration {
    pub fn new(epsilon: f32, decay_per_second: f32, floor: f32) -> Self {
        Self {
            epsilon,
            decay_per_second,
            floor,
        }
    }

    pub fn decay(&mut self, dt: f32) {
        if self.decay_per_second > 0.0 && self.epsilon > self.floor {
            self.epsilon = (self.epsilon - self.decay_per_second * dt).max(self.floor);
        }
    }
}
