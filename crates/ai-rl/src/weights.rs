use std::collections::BTreeMap;

use ai_core::DeterministicRng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::action::CombatAction;
use crate::features::{Feature, FeatureVector};

/// Half-width of the uniform noise added to every fresh weight.
pub const INIT_NOISE: f32 = 0.1;

/// Learned weights are clamped to `±WEIGHT_LIMIT`.
pub const WEIGHT_LIMIT: f32 = 1.0e4;

/// Per-action linear weights: action -> feature -> weight.
///
/// Ordered maps keep iteration (and therefore serialization and float
/// summation order) deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct WeightTable {
    rows: BTreeMap<CombatAction, BTreeMap<Feature, f32>>,
}

impl WeightTable {
    /// An all-zero table with a row for every action.
    pub fn new() -> Self {
        let mut rows = BTreeMap::new();
        for action in CombatAction::ALL {
            rows.insert(action, Feature::ALL.iter().map(|&f| (f, 0.0)).collect());
        }
        Self { rows }
    }

    /// A table without any rows. What the store hands out for an unseen
    /// archetype.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fresh table for a never-seen archetype: small noise plus priors that
    /// keep an untrained agent from flailing.
    pub fn seeded(rng: &mut impl DeterministicRng) -> Self {
        let mut table = Self::new();
        for action in CombatAction::ALL {
            for feature in Feature::ALL {
                table.set(action, feature, rng.next_f32_range(-INIT_NOISE, INIT_NOISE));
            }
        }

        use CombatAction::*;
        use Feature::*;
        // Close the gap when out of range.
        table.add(MoveTowardTarget, BeyondMaxRange, 1.0);
        table.add(MoveTowardTarget, DistanceToTarget, 0.5);
        table.add(MoveAwayFromTarget, BeyondMaxRange, -1.0);
        table.add(StrafeLeft, BeyondMaxRange, -0.5);
        table.add(StrafeRight, BeyondMaxRange, -0.5);
        // Attack when rested and close; never from out of range.
        table.add(PrimaryAttack, TimeSinceLastAttack, 0.8);
        table.add(PrimaryAttack, DistanceToTarget, -0.5);
        table.add(PrimaryAttack, BeyondMaxRange, -0.8);
        table.add(SecondaryAttack, BeyondMaxRange, -0.8);
        table
    }

    pub fn get(&self, action: CombatAction, feature: Feature) -> f32 {
        self.rows
            .get(&action)
            .and_then(|row| row.get(&feature))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn set(&mut self, action: CombatAction, feature: Feature, weight: f32) {
        self.rows.entry(action).or_default().insert(feature, weight);
    }

    fn add(&mut self, action: CombatAction, feature: Feature, delta: f32) {
        let w = self.get(action, feature);
        self.set(action, feature, w + delta);
    }

    pub fn row(&self, action: CombatAction) -> Option<&BTreeMap<Feature, f32>> {
        self.rows.get(&action)
    }

    /// `Σ w[a][f] * x[f]`. Missing weights count as zero.
    pub fn q_value(&self, action: CombatAction, features: &FeatureVector) -> f32 {
        let Some(row) = self.rows.get(&action) else {
            return 0.0;
        };
        features
            .iter()
            .map(|(f, x)| row.get(&f).copied().unwrap_or(0.0) * x)
            .sum()
    }

    /// `w[a][f] += scale * x[f]` for every feature, clamped to
    /// `±WEIGHT_LIMIT`.
    ///
    /// Returns `false` and leaves the table untouched when any resulting
    /// weight would be non-finite.
    pub fn nudge(
        &mut self,
        action: CombatAction,
        features: &FeatureVector,
        scale: f32,
    ) -> bool {
        let finite = features
            .iter()
            .all(|(f, x)| (self.get(action, f) + scale * x).is_finite());
        if !finite {
            return false;
        }

        let row = self.rows.entry(action).or_default();
        for (f, x) in features.iter() {
            let w = row.entry(f).or_insert(0.0);
            *w = (*w + scale * x).clamp(-WEIGHT_LIMIT, WEIGHT_LIMIT);
        }
        true
    }
}
