//! Headless arena hosting the combat brains.

use std::collections::BTreeMap;

use ai_core::{AgentId, Vec2, WorldMut, WorldView};
use ai_rl::{Archetype, CombatWorldMut, CombatWorldView, MoveIntent, Vitals};

use crate::config::{ArenaConfig, Obstacle, PlayerConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

impl AgentId for EntityId {
    fn stable_id(self) -> u64 {
        self.0
    }
}

pub const PLAYER: EntityId = EntityId(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Team {
    Player,
    Elites,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub position: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub team: Team,
    pub archetype: Option<Archetype>,
    pub intent: Option<MoveIntent>,
}

impl Entity {
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

/// Combat log totals for one round.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CombatLog {
    pub damage_to_player: f32,
    pub damage_to_elites: f32,
    pub healing: f32,
}

#[derive(Debug)]
pub struct ArenaWorld {
    now: f32,
    radius: f32,
    obstacles: Vec<Obstacle>,
    entities: BTreeMap<EntityId, Entity>,
    player: PlayerConfig,
    player_cooldown: f32,
    orbit_angle: f32,
    pub log: CombatLog,
}

impl ArenaWorld {
    pub fn new(config: &ArenaConfig) -> Self {
        let player = config.player.clone();
        let mut entities = BTreeMap::new();
        entities.insert(
            PLAYER,
            Entity {
                position: Vec2::new(player.orbit_radius, 0.0),
                health: player.health,
                max_health: player.health,
                speed: 0.0,
                team: Team::Player,
                archetype: None,
                intent: None,
            },
        );
        Self {
            now: 0.0,
            radius: config.arena_radius,
            obstacles: config.obstacles.clone(),
            entities,
            player,
            player_cooldown: 0.0,
            orbit_angle: 0.0,
            log: CombatLog::default(),
        }
    }

    pub fn spawn_elite(&mut self, id: EntityId, archetype: Archetype, at: Vec2) {
        let stats = archetype.default_stats();
        self.entities.insert(
            id,
            Entity {
                position: self.clamp_to_arena(at),
                health: stats.max_health,
                max_health: stats.max_health,
                speed: stats.movement_speed,
                team: Team::Elites,
                archetype: Some(archetype),
                intent: None,
            },
        );
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.get(&id).is_some_and(Entity::is_alive)
    }

    pub fn player_alive(&self) -> bool {
        self.is_alive(PLAYER)
    }

    pub fn advance_clock(&mut self, dt: f32) {
        self.now += dt;
    }

    /// Circle the arena center and shoot the closest living elite in range.
    pub fn step_player(&mut self, dt: f32) {
        if !self.player_alive() {
            return;
        }
        self.orbit_angle += self.player.orbit_speed * dt;
        let orbit =
            Vec2::new(self.orbit_angle.cos(), self.orbit_angle.sin()) * self.player.orbit_radius;
        if let Some(player) = self.entities.get_mut(&PLAYER) {
            player.position = orbit;
        }

        self.player_cooldown -= dt;
        if self.player_cooldown > 0.0 {
            return;
        }
        let target = self
            .entities
            .iter()
            .filter(|(_, e)| e.team == Team::Elites && e.is_alive())
            .map(|(id, e)| (*id, e.position.distance(orbit)))
            .filter(|(_, d)| *d <= self.player.range)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id);

        if let Some(id) = target {
            if self.has_line_of_sight(PLAYER, id) {
                self.report_damage(id, self.player.damage, PLAYER);
                self.player_cooldown = self.player.attack_interval;
            }
        }
    }

    /// Carry out pending movement intents at each entity's speed.
    pub fn integrate(&mut self, dt: f32) {
        let radius = self.radius;
        for entity in self.entities.values_mut() {
            if !entity.is_alive() {
                continue;
            }
            let Some(intent) = entity.intent else {
                continue;
            };
            let to_goal = intent.destination - entity.position;
            let distance = to_goal.length();
            if distance <= intent.acceptance_radius {
                entity.intent = None;
                continue;
            }
            let step = (entity.speed * dt).min(distance);
            let next = entity.position + to_goal.normalize_or_zero() * step;
            entity.position = clamp(next, radius);
        }
    }

    fn clamp_to_arena(&self, p: Vec2) -> Vec2 {
        clamp(p, self.radius)
    }

    fn blocked(&self, from: Vec2, to: Vec2) -> bool {
        self.obstacles
            .iter()
            .any(|o| segment_hits_circle(from, to, Vec2::new(o.x, o.y), o.radius))
    }
}

fn clamp(p: Vec2, radius: f32) -> Vec2 {
    let len = p.length();
    if len > radius {
        p * (radius / len)
    } else {
        p
    }
}

fn segment_hits_circle(a: Vec2, b: Vec2, center: Vec2, radius: f32) -> bool {
    let ab = b - a;
    let len_sq = ab.dot(ab);
    let t = if len_sq <= f32::EPSILON {
        0.0
    } else {
        ((center - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    };
    let closest = a + ab * t;
    closest.distance(center) < radius
}

impl WorldView for ArenaWorld {
    type Agent = EntityId;

    fn now_seconds(&self) -> f32 {
        self.now
    }
}

impl WorldMut for ArenaWorld {}

impl CombatWorldView for ArenaWorld {
    fn position(&self, agent: EntityId) -> Option<Vec2> {
        self.entities.get(&agent).map(|e| e.position)
    }

    fn vitals(&self, agent: EntityId) -> Option<Vitals> {
        self.entities
            .get(&agent)
            .map(|e| Vitals::new(e.health, e.max_health))
    }

    fn target_of(&self, agent: EntityId) -> Option<EntityId> {
        match self.entities.get(&agent)?.team {
            Team::Elites if self.player_alive() => Some(PLAYER),
            _ => None,
        }
    }

    fn has_line_of_sight(&self, from: EntityId, to: EntityId) -> bool {
        match (self.position(from), self.position(to)) {
            (Some(a), Some(b)) => !self.blocked(a, b),
            _ => false,
        }
    }

    fn teammates(&self, agent: EntityId) -> Vec<EntityId> {
        let Some(team) = self.entities.get(&agent).map(|e| e.team) else {
            return Vec::new();
        };
        self.entities
            .iter()
            .filter(|(_, e)| e.team == team)
            .map(|(id, _)| *id)
            .collect()
    }

    fn entities_within(&self, center: Vec2, radius: f32) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, e)| e.position.distance(center) <= radius)
            .map(|(id, _)| *id)
            .collect()
    }

    fn is_decision_driven(&self, agent: EntityId) -> bool {
        self.entities
            .get(&agent)
            .is_some_and(|e| e.team == Team::Elites)
    }

    fn archetype_of(&self, agent: EntityId) -> Option<Archetype> {
        self.entities.get(&agent).and_then(|e| e.archetype)
    }
}

impl CombatWorldMut for ArenaWorld {
    fn move_to(&mut self, agent: EntityId, intent: MoveIntent) {
        let destination = self.clamp_to_arena(intent.destination);
        if let Some(entity) = self.entities.get_mut(&agent) {
            entity.intent = Some(MoveIntent {
                destination,
                ..intent
            });
        }
    }

    fn report_damage(&mut self, target: EntityId, amount: f32, source: EntityId) {
        let Some(entity) = self.entities.get_mut(&target) else {
            return;
        };
        if !entity.is_alive() {
            return;
        }
        entity.health = (entity.health - amount).max(0.0);
        match entity.team {
            Team::Player => self.log.damage_to_player += amount,
            Team::Elites => self.log.damage_to_elites += amount,
        }
        if !entity.is_alive() {
            tracing::debug!(target = target.0, source = source.0, "entity died");
        }
    }

    fn report_heal(&mut self, target: EntityId, amount: f32, _source: EntityId) {
        if let Some(entity) = self.entities.get_mut(&target) {
            if entity.is_alive() {
                entity.health = (entity.health + amount).min(entity.max_health);
                self.log.healing += amount;
            }
        }
    }
}
