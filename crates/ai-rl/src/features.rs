use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::observation::Observation;

/// Named inputs of the linear value function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Feature {
    DistanceToTarget,
    SelfHealth,
    TimeSinceLastAttack,
    BeyondMaxRange,
    TookDamageRecently,
    TargetHealth,
    LineOfSight,
    Ally1Health,
    Ally1Distance,
    Ally2Health,
    Ally2Distance,
    Ally3Health,
    Ally3Distance,
    NearbyAllies,
}

fn flag(b: bool) -> f32 {
    if b {
        1.0
    } else {
        0.0
    }
}

impl Feature {
    pub const COUNT: usize = 14;

    pub const ALL: [Feature; Self::COUNT] = [
        Feature::DistanceToTarget,
        Feature::SelfHealth,
        Feature::TimeSinceLastAttack,
        Feature::BeyondMaxRange,
        Feature::TookDamageRecently,
        Feature::TargetHealth,
        Feature::LineOfSight,
        Feature::Ally1Health,
        Feature::Ally1Distance,
        Feature::Ally2Health,
        Feature::Ally2Distance,
        Feature::Ally3Health,
        Feature::Ally3Distance,
        Feature::NearbyAllies,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Feature::DistanceToTarget => "distance_to_target",
            Feature::SelfHealth => "self_health",
            Feature::TimeSinceLastAttack => "time_since_last_attack",
            Feature::BeyondMaxRange => "beyond_max_range",
            Feature::TookDamageRecently => "took_damage_recently",
            Feature::TargetHealth => "target_health",
            Feature::LineOfSight => "line_of_sight",
            Feature::Ally1Health => "ally1_health",
            Feature::Ally1Distance => "ally1_distance",
            Feature::Ally2Health => "ally2_health",
            Feature::Ally2Distance => "ally2_distance",
            Feature::Ally3Health => "ally3_health",
            Feature::Ally3Distance => "ally3_distance",
            Feature::NearbyAllies => "nearby_allies",
        }
    }

    pub fn value(self, obs: &Observation) -> f32 {
        match self {
            Feature::DistanceToTarget => obs.distance_to_target,
            Feature::SelfHealth => obs.self_health,
            Feature::TimeSinceLastAttack => obs.time_since_last_attack,
            Feature::BeyondMaxRange => flag(obs.beyond_max_range),
            Feature::TookDamageRecently => flag(obs.took_damage_recently),
            Feature::TargetHealth => obs.target_health,
            Feature::LineOfSight => flag(obs.line_of_sight),
            Feature::Ally1Health => obs.allies[0].health,
            Feature::Ally1Distance => obs.allies[0].distance,
            Feature::Ally2Health => obs.allies[1].health,
            Feature::Ally2Distance => obs.allies[1].distance,
            Feature::Ally3Health => obs.allies[2].health,
            Feature::Ally3Distance => obs.allies[2].distance,
            Feature::NearbyAllies => obs.nearby_allies,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dense feature values, indexed by [`Feature::index`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f32; Feature::COUNT]);

impl FeatureVector {
    pub fn get(&self, feature: Feature) -> f32 {
        self.0[feature.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, f32)> + '_ {
        Feature::ALL.iter().map(move |&f| (f, self.0[f.index()]))
    }
}

impl From<&Observation> for FeatureVector {
    fn from(obs: &Observation) -> Self {
        let mut values = [0.0; Feature::COUNT];
        for f in Feature::ALL {
            values[f.index()] = f.value(obs);
        }
        FeatureVector(values)
    }
}
