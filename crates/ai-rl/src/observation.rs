//! Per-tick observation model.
//!
//! An [`Observation`] is rebuilt from world queries every decision tick and is
//! never mutated in place afterwards. Every numeric field is already clamped to
//! `[0, 1]` so weight magnitudes are comparable across features.

use ai_core::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::archetype::CombatStats;
use crate::world::CombatWorldView;

/// Horizon over which time-since-last-attack saturates.
pub const ATTACK_TIME_HORIZON: f32 = 5.0;
/// Damage within this many seconds counts as "recent".
pub const RECENT_DAMAGE_WINDOW: f32 = 1.0;
/// Normalizer for ally distances.
pub const ALLY_DISTANCE_HORIZON: f32 = 2000.0;
/// Radius for the nearby-allies count.
pub const NEARBY_ALLY_RADIUS: f32 = 1000.0;
/// Assumed squad size normalizing the nearby-allies count.
pub const MAX_SQUAD_SIZE: f32 = 5.0;
pub const TRACKED_ALLIES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AllySlot {
    pub health: f32,
    pub distance: f32,
}

impl AllySlot {
    /// No ally: zero health, maximally far.
    pub const EMPTY: AllySlot = AllySlot {
        health: 0.0,
        distance: 1.0,
    };

    pub fn is_occupied(&self) -> bool {
        self.health > 0.0
    }
}

impl Default for AllySlot {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Observation {
    /// Normalized by the agent's own max attack range.
    pub distance_to_target: f32,
    pub self_health: f32,
    pub time_since_last_attack: f32,
    pub beyond_max_range: bool,
    pub took_damage_recently: bool,
    /// Always 1.0; target health is not wired yet.
    pub target_health: f32,
    pub line_of_sight: bool,
    /// Closest first.
    pub allies: [AllySlot; TRACKED_ALLIES],
    pub nearby_allies: f32,
}

impl Default for Observation {
    fn default() -> Self {
        Self {
            distance_to_target: 0.0,
            self_health: 0.0,
            time_since_last_attack: 0.0,
            beyond_max_range: false,
            took_damage_recently: false,
            target_health: 0.0,
            line_of_sight: false,
            allies: [AllySlot::EMPTY; TRACKED_ALLIES],
            nearby_allies: 0.0,
        }
    }
}

impl Observation {
    pub fn closest_ally(&self) -> AllySlot {
        self.allies[0]
    }

    /// Mean health over occupied ally slots, `None` when no ally is tracked.
    pub fn mean_ally_health(&self) -> Option<f32> {
        let (sum, count) = self
            .allies
            .iter()
            .filter(|s| s.is_occupied())
            .fold((0.0_f32, 0_u32), |(sum, count), s| (sum + s.health, count + 1));
        (count > 0).then(|| sum / count as f32)
    }
}

/// Seconds elapsed since the agent's own combat events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatClock {
    pub since_last_attack: f32,
    pub since_damage_taken: f32,
}

impl Default for CombatClock {
    fn default() -> Self {
        Self {
            since_last_attack: 0.0,
            since_damage_taken: f32::MAX,
        }
    }
}

impl CombatClock {
    pub fn advance(&mut self, dt: f32) {
        self.since_last_attack += dt;
        self.since_damage_taken += dt;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetFix<A> {
    pub agent: A,
    pub position: Vec2,
    /// World units.
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllyFix<A> {
    pub agent: A,
    pub position: Vec2,
    pub distance: f32,
    pub health: f32,
}

/// An observation plus the raw world facts it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Perception<A> {
    pub observation: Observation,
    pub self_position: Vec2,
    pub target: Option<TargetFix<A>>,
    /// Closest first, at most [`TRACKED_ALLIES`].
    pub allies: Vec<AllyFix<A>>,
}

impl<A> Perception<A> {
    fn blank() -> Self {
        Self {
            observation: Observation::default(),
            self_position: Vec2::ZERO,
            target: None,
            allies: Vec::new(),
        }
    }
}

fn is_live_teammate<W: CombatWorldView>(world: &W, me: W::Agent, other: W::Agent) -> bool {
    other != me
        && world.is_decision_driven(other)
        && world.vitals(other).is_some_and(|v| v.is_alive())
}

/// Build the observation for `agent`. Never fails: a missing self position or
/// target yields a default observation.
pub fn perceive<W: CombatWorldView>(
    world: &W,
    agent: W::Agent,
    stats: &CombatStats,
    clock: &CombatClock,
) -> Perception<W::Agent> {
    let Some(self_position) = world.position(agent) else {
        return Perception::blank();
    };

    let team = world.teammates(agent);
    let mut allies: Vec<AllyFix<W::Agent>> = team
        .iter()
        .copied()
        .filter(|&a| is_live_teammate(world, agent, a))
        .filter_map(|a| {
            let position = world.position(a)?;
            let vitals = world.vitals(a)?;
            Some(AllyFix {
                agent: a,
                position,
                distance: self_position.distance(position),
                health: vitals.fraction(),
            })
        })
        .collect();
    allies.sort_unstable_by(|a, b| a.distance.total_cmp(&b.distance));
    allies.truncate(TRACKED_ALLIES);

    let target = world.target_of(agent).and_then(|t| {
        let position = world.position(t)?;
        Some(TargetFix {
            agent: t,
            position,
            distance: self_position.distance(position),
        })
    });

    let Some(fix) = target else {
        return Perception {
            self_position,
            allies,
            ..Perception::blank()
        };
    };

    let mut slots = [AllySlot::EMPTY; TRACKED_ALLIES];
    for (slot, ally) in slots.iter_mut().zip(&allies) {
        *slot = AllySlot {
            health: ally.health,
            distance: (ally.distance / ALLY_DISTANCE_HORIZON).clamp(0.0, 1.0),
        };
    }

    let nearby = world
        .entities_within(self_position, NEARBY_ALLY_RADIUS)
        .into_iter()
        .filter(|a| team.contains(a))
        .filter(|&a| is_live_teammate(world, agent, a))
        .count();

    let range = stats.max_attack_range.max(f32::EPSILON);
    let observation = Observation {
        distance_to_target: (fix.distance / range).clamp(0.0, 1.0),
        self_health: world.vitals(agent).map_or(0.0, |v| v.fraction()),
        time_since_last_attack: (clock.since_last_attack / ATTACK_TIME_HORIZON).clamp(0.0, 1.0),
        beyond_max_range: fix.distance > stats.max_attack_range,
        took_damage_recently: clock.since_damage_taken < RECENT_DAMAGE_WINDOW,
        target_health: 1.0,
        line_of_sight: world.has_line_of_sight(agent, fix.agent),
        allies: slots,
        nearby_allies: (nearby as f32 / MAX_SQUAD_SIZE).clamp(0.0, 1.0),
    };

    Perception {
        observation,
        self_position,
        target: Some(fix),
        allies,
    }
}
