//! Per-archetype reward shaping.
//!
//! Every archetype scores a transition `(previous, current)` from the same
//! four families of additive terms: engagement, throughput, survival and
//! positional bonuses. Dispatch is a plain `match` over [`Archetype`].
//! Reward functions never fail; without a context they score zero.

mod bruiser;
mod kiter;
mod striker;
mod support;
mod tank;

use crate::action::CombatAction;
use crate::archetype::Archetype;
use crate::observation::Observation;

/// Weight of the "change in throughput" term, shared by every archetype.
pub const THROUGHPUT_DELTA_SCALE: f32 = 5.0;
/// Closing / opening gain when forced back into the fight.
pub const FORCED_ENGAGEMENT_SCALE: f32 = 50.0;
/// Penalty for not changing distance while out of range.
pub const STALL_PENALTY: f32 = -5.0;
/// Seconds after an attack that count as "just attacked".
pub const JUST_ATTACKED_WINDOW: f32 = 1.5;

/// Distances from a bodyguard, its ward and the target, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuardGeometry {
    pub self_to_ward: f32,
    pub target_to_ward: f32,
    pub self_to_target: f32,
}

impl GuardGeometry {
    /// The guard stands between the ward and the target.
    pub fn is_interposed(&self) -> bool {
        self.self_to_ward < self.target_to_ward && self.self_to_target < self.target_to_ward
    }
}

/// Auxiliary counters that are not part of the observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardContext {
    pub last_action: CombatAction,
    pub dps: f32,
    pub previous_dps: f32,
    pub hps: f32,
    pub previous_hps: f32,
    /// Attack machine is `Normal`.
    pub can_attack: bool,
    pub just_attacked: bool,
    /// A damage-over-time effect from this agent is still ticking.
    pub dot_active: bool,
    pub target_distance_units: f32,
    pub previous_target_distance_units: f32,
    pub guard: Option<GuardGeometry>,
}

impl Default for RewardContext {
    fn default() -> Self {
        Self {
            last_action: CombatAction::MoveTowardTarget,
            dps: 0.0,
            previous_dps: 0.0,
            hps: 0.0,
            previous_hps: 0.0,
            can_attack: true,
            just_attacked: false,
            dot_active: false,
            target_distance_units: 0.0,
            previous_target_distance_units: 0.0,
            guard: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RewardBreakdown {
    pub engagement: f32,
    pub throughput: f32,
    pub survival: f32,
    pub positional: f32,
}

impl RewardBreakdown {
    pub fn total(&self) -> f32 {
        self.engagement + self.throughput + self.survival + self.positional
    }
}

pub fn reward_breakdown(
    archetype: Archetype,
    prev: &Observation,
    cur: &Observation,
    ctx: Option<&RewardContext>,
) -> RewardBreakdown {
    let Some(ctx) = ctx else {
        return RewardBreakdown::default();
    };
    match archetype {
        Archetype::Kiter => kiter::breakdown(prev, cur, ctx),
        Archetype::Striker => striker::breakdown(prev, cur, ctx),
        Archetype::Tank => tank::breakdown(prev, cur, ctx),
        Archetype::Support => support::breakdown(prev, cur, ctx),
        Archetype::Bruiser => bruiser::breakdown(prev, cur, ctx),
    }
}

pub fn shaped_reward(
    archetype: Archetype,
    prev: &Observation,
    cur: &Observation,
    ctx: Option<&RewardContext>,
) -> f32 {
    reward_breakdown(archetype, prev, cur, ctx).total()
}

/// Positive when the agent moved away from the target.
fn distance_delta(prev: &Observation, cur: &Observation) -> f32 {
    cur.distance_to_target - prev.distance_to_target
}

fn forced_engagement(delta: f32) -> f32 {
    if delta < 0.0 {
        FORCED_ENGAGEMENT_SCALE * -delta
    } else if delta > 0.0 {
        -FORCED_ENGAGEMENT_SCALE * delta
    } else {
        STALL_PENALTY
    }
}

fn throughput(rate: f32, previous_rate: f32, base: f32) -> f32 {
    rate * base + (rate - previous_rate) * THROUGHPUT_DELTA_SCALE
}

fn survival(prev: &Observation, cur: &Observation, scale: f32) -> f32 {
    (cur.self_health - prev.self_health) * scale
}

/// Some ally is closer than the target and the squad is around.
fn covered_by_ally(cur: &Observation) -> bool {
    let ally = cur.closest_ally();
    cur.nearby_allies > 0.2 && ally.is_occupied() && ally.distance < cur.distance_to_target
}

fn bonus(cond: bool, amount: f32) -> f32 {
    if cond {
        amount
    } else {
        0.0
    }
}
