//! World collaborator contracts for combat brains.
//!
//! The core crate only knows about a clock; combat perception and effects are
//! extension traits so any engine (or a headless test sandbox) can host the
//! brains. Every query is infallible: absence is expressed with `Option` or an
//! empty list, never with an error.

use ai_core::{Vec2, WorldMut, WorldView};

use crate::action::MoveIntent;
use crate::archetype::{Archetype, CombatStats};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vitals {
    pub health: f32,
    pub max_health: f32,
}

impl Vitals {
    pub fn new(health: f32, max_health: f32) -> Self {
        Self { health, max_health }
    }

    /// Health fraction clamped to [0, 1]. Zero when max health is degenerate.
    pub fn fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

pub trait CombatWorldView: WorldView {
    fn position(&self, agent: Self::Agent) -> Option<Vec2>;

    fn vitals(&self, agent: Self::Agent) -> Option<Vitals>;

    /// The entity this agent is fighting, if any.
    fn target_of(&self, agent: Self::Agent) -> Option<Self::Agent>;

    /// True when the ray is unobstructed or the first thing it hits is `to`.
    fn has_line_of_sight(&self, from: Self::Agent, to: Self::Agent) -> bool;

    /// Candidate teammates of `agent`. May include dead, inert or
    /// player-controlled entities; callers filter.
    fn teammates(&self, agent: Self::Agent) -> Vec<Self::Agent>;

    fn entities_within(&self, center: Vec2, radius: f32) -> Vec<Self::Agent>;

    /// Whether the entity is governed by a decision-maker.
    fn is_decision_driven(&self, agent: Self::Agent) -> bool;

    fn archetype_of(&self, _agent: Self::Agent) -> Option<Archetype> {
        None
    }

    /// Per-entity stat overrides. `None` keeps archetype defaults.
    fn combat_stats(&self, _agent: Self::Agent) -> Option<CombatStats> {
        None
    }
}

pub trait CombatWorldMut: WorldMut + CombatWorldView {
    /// Hand a movement intent to the movement-execution collaborator.
    fn move_to(&mut self, agent: Self::Agent, intent: MoveIntent);

    /// Combat log: damage resolved by `source` against `target`.
    fn report_damage(&mut self, target: Self::Agent, amount: f32, source: Self::Agent);

    /// Combat log: healing resolved by `source` on `target`.
    fn report_heal(&mut self, target: Self::Agent, amount: f32, source: Self::Agent);
}
