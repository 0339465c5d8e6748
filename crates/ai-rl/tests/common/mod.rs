#![allow(dead_code)]

use std::collections::BTreeMap;

use ai_core::{Vec2, WorldMut, WorldView};
use ai_rl::{
    Archetype, CombatAction, CombatStats, CombatWorldMut, CombatWorldView, Feature, MoveIntent,
    Observation, Vitals, WeightTable,
};

pub const PLAYER: u64 = 1;

#[derive(Debug, Clone)]
pub struct Body {
    pub position: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub team: u8,
    pub driven: bool,
    pub archetype: Option<Archetype>,
    pub target: Option<u64>,
    pub stats: Option<CombatStats>,
}

/// Minimal headless world: the combat log applies damage and healing
/// directly, movement intents are recorded but not executed.
#[derive(Debug, Default)]
pub struct SandboxWorld {
    pub now: f32,
    pub bodies: BTreeMap<u64, Body>,
    pub los_blocked: bool,
    pub moves: Vec<(u64, MoveIntent)>,
    pub damage: Vec<(u64, f32, u64)>,
    pub heals: Vec<(u64, f32, u64)>,
}

impl SandboxWorld {
    pub fn with_player(at: Vec2) -> Self {
        let mut world = Self::default();
        world.bodies.insert(
            PLAYER,
            Body {
                position: at,
                health: 1000.0,
                max_health: 1000.0,
                team: 0,
                driven: false,
                archetype: None,
                target: None,
                stats: None,
            },
        );
        world
    }

    /// An elite on team 1 fighting the player.
    pub fn add_elite(&mut self, id: u64, archetype: Archetype, at: Vec2) {
        let stats = archetype.default_stats();
        self.bodies.insert(
            id,
            Body {
                position: at,
                health: stats.max_health,
                max_health: stats.max_health,
                team: 1,
                driven: true,
                archetype: Some(archetype),
                target: Some(PLAYER),
                stats: None,
            },
        );
    }

    pub fn body_mut(&mut self, id: u64) -> &mut Body {
        self.bodies.get_mut(&id).expect("body exists")
    }

    pub fn place(&mut self, id: u64, at: Vec2) {
        self.body_mut(id).position = at;
    }

    pub fn advance(&mut self, dt: f32) {
        self.now += dt;
    }
}

impl WorldView for SandboxWorld {
    type Agent = u64;

    fn now_seconds(&self) -> f32 {
        self.now
    }
}

impl WorldMut for SandboxWorld {}

impl CombatWorldView for SandboxWorld {
    fn position(&self, agent: u64) -> Option<Vec2> {
        self.bodies.get(&agent).map(|b| b.position)
    }

    fn vitals(&self, agent: u64) -> Option<Vitals> {
        self.bodies
            .get(&agent)
            .map(|b| Vitals::new(b.health, b.max_health))
    }

    fn target_of(&self, agent: u64) -> Option<u64> {
        self.bodies.get(&agent).and_then(|b| b.target)
    }

    fn has_line_of_sight(&self, _from: u64, _to: u64) -> bool {
        !self.los_blocked
    }

    fn teammates(&self, agent: u64) -> Vec<u64> {
        let Some(team) = self.bodies.get(&agent).map(|b| b.team) else {
            return Vec::new();
        };
        self.bodies
            .iter()
            .filter(|(_, b)| b.team == team)
            .map(|(id, _)| *id)
            .collect()
    }

    fn entities_within(&self, center: Vec2, radius: f32) -> Vec<u64> {
        self.bodies
            .iter()
            .filter(|(_, b)| b.position.distance(center) <= radius)
            .map(|(id, _)| *id)
            .collect()
    }

    fn is_decision_driven(&self, agent: u64) -> bool {
        self.bodies.get(&agent).is_some_and(|b| b.driven)
    }

    fn archetype_of(&self, agent: u64) -> Option<Archetype> {
        self.bodies.get(&agent).and_then(|b| b.archetype)
    }

    fn combat_stats(&self, agent: u64) -> Option<CombatStats> {
        self.bodies.get(&agent).and_then(|b| b.stats)
    }
}

impl CombatWorldMut for SandboxWorld {
    fn move_to(&mut self, agent: u64, intent: MoveIntent) {
        self.moves.push((agent, intent));
    }

    fn report_damage(&mut self, target: u64, amount: f32, source: u64) {
        self.damage.push((target, amount, source));
        if let Some(body) = self.bodies.get_mut(&target) {
            body.health = (body.health - amount).max(0.0);
        }
    }

    fn report_heal(&mut self, target: u64, amount: f32, source: u64) {
        self.heals.push((target, amount, source));
        if let Some(body) = self.bodies.get_mut(&target) {
            body.health = (body.health + amount).min(body.max_health);
        }
    }
}

/// A table where `action` always wins while a target is in view
/// (target health is 1.0 whenever a target exists).
pub fn always(action: CombatAction) -> WeightTable {
    let mut table = WeightTable::new();
    table.set(action, Feature::TargetHealth, 10.0);
    table
}

pub fn obs_at(distance: f32, beyond: bool) -> Observation {
    Observation {
        distance_to_target: distance,
        beyond_max_range: beyond,
        self_health: 1.0,
        target_health: 1.0,
        ..Observation::default()
    }
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}
