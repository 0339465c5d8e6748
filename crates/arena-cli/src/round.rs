//! Round loop: spawn the roster, step everyone at a fixed tick, retire the
//! dead into the weight store.

use std::f32::consts::TAU;

use ai_core::rng::derive_seed;
use ai_core::{sort_by_stable_id, DeterministicRng, SplitMix64, TickContext, Vec2};
use ai_rl::{Archetype, CombatAgent, CombatCounters, WeightStore};
use ai_tools::TracingSink;

use crate::config::ArenaConfig;
use crate::world::{ArenaWorld, EntityId, PLAYER};

const SPAWN_STREAM: u64 = 0xa7e_0001;
const BRAIN_STREAM: u64 = 0xa7e_0002;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RoundReport {
    pub round: u32,
    pub seconds: f32,
    pub spawned: u32,
    pub killed: u32,
    pub player_survived: bool,
    pub damage_to_player: f32,
    pub damage_to_elites: f32,
    pub healing: f32,
    pub hits: u32,
    pub whiffs: u32,
    pub heals: u32,
    pub decisions: u64,
    pub explorations: u64,
}

impl RoundReport {
    fn absorb(&mut self, counters: &CombatCounters) {
        self.hits += counters.hits;
        self.whiffs += counters.whiffs;
        self.heals += counters.heals;
        self.decisions += counters.decisions;
        self.explorations += counters.explorations;
    }

    pub fn hit_rate(&self) -> f32 {
        let resolved = self.hits + self.whiffs;
        if resolved == 0 {
            0.0
        } else {
            self.hits as f32 / resolved as f32
        }
    }

    pub fn exploration_rate(&self) -> f32 {
        if self.decisions == 0 {
            0.0
        } else {
            self.explorations as f32 / self.decisions as f32
        }
    }
}

/// Owns the weight store for a whole session of rounds.
#[derive(Debug)]
pub struct Arena {
    config: ArenaConfig,
    store: WeightStore,
    trace: bool,
}

impl Arena {
    pub fn new(config: ArenaConfig) -> Self {
        Self {
            config,
            store: WeightStore::new(),
            trace: false,
        }
    }

    /// Stream every agent's decision trace to `tracing` at TRACE level.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn store(&self) -> &WeightStore {
        &self.store
    }

    pub fn run(&mut self, rounds: u32) -> Vec<RoundReport> {
        (0..rounds).map(|round| self.run_round(round)).collect()
    }

    pub fn run_round(&mut self, round: u32) -> RoundReport {
        let config = &self.config;
        let mut world = ArenaWorld::new(config);
        let mut spawn_rng =
            SplitMix64::new(derive_seed(config.seed, round as u64, SPAWN_STREAM));
        let brain_seed = derive_seed(config.seed, round as u64, BRAIN_STREAM);

        let mut roster: Vec<(EntityId, Archetype)> = Vec::new();
        let mut next_id = PLAYER.0 + 1;
        for entry in &config.roster {
            for _ in 0..entry.count {
                roster.push((EntityId(next_id), entry.archetype));
                next_id += 1;
            }
        }
        let mut order: Vec<EntityId> = roster.iter().map(|(id, _)| *id).collect();
        sort_by_stable_id(&mut order);

        let mut agents = Vec::with_capacity(order.len());
        for id in order {
            let Some(archetype) = roster.iter().find(|(r, _)| *r == id).map(|(_, a)| *a) else {
                continue;
            };
            let angle = spawn_rng.next_f32_range(0.0, TAU);
            let at = Vec2::new(angle.cos(), angle.sin()) * config.spawn_radius;
            world.spawn_elite(id, archetype, at);

            let mut agent =
                CombatAgent::spawn(id, archetype, config.learning, &self.store, brain_seed);
            if self.trace {
                agent.set_trace_sink(Box::new(TracingSink));
            }
            agents.push(agent);
        }

        let mut report = RoundReport {
            round,
            spawned: agents.len() as u32,
            ..RoundReport::default()
        };
        tracing::info!(
            round,
            elites = report.spawned,
            session = self.store.session(),
            "round start"
        );

        let dt = config.tick_seconds;
        let max_ticks = (config.max_round_seconds / dt).ceil() as u64;
        let mut tick = 0;
        while tick < max_ticks && world.player_alive() && !agents.is_empty() {
            let ctx = TickContext {
                tick,
                dt_seconds: dt,
                seed: config.seed,
            };
            world.advance_clock(dt);
            world.step_player(dt);
            for agent in agents.iter_mut() {
                agent.tick(&ctx, &mut world);
            }
            world.integrate(dt);

            let (dead, alive): (Vec<_>, Vec<_>) = std::mem::take(&mut agents)
                .into_iter()
                .partition(|a| !world.is_alive(a.handle()));
            agents = alive;
            for agent in dead {
                report.absorb(agent.counters());
                report.killed += 1;
                agent.retire(&mut self.store);
            }
            tick += 1;
        }

        for agent in agents {
            report.absorb(agent.counters());
            agent.retire(&mut self.store);
        }

        report.seconds = tick as f32 * dt;
        report.player_survived = world.player_alive();
        report.damage_to_player = world.log.damage_to_player;
        report.damage_to_elites = world.log.damage_to_elites;
        report.healing = world.log.healing;

        tracing::info!(
            round,
            seconds = report.seconds,
            killed = report.killed,
            player_survived = report.player_survived,
            damage_to_player = report.damage_to_player,
            hit_rate = report.hit_rate(),
            "round over"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RosterEntry;
    use ai_rl::weights::WEIGHT_LIMIT;
    use ai_rl::{CombatAction, Feature};

    fn short_config() -> ArenaConfig {
        ArenaConfig {
            max_round_seconds: 5.0,
            ..ArenaConfig::default()
        }
    }

    #[test]
    fn every_archetype_has_weights_after_one_round() {
        let mut arena = Arena::new(short_config());
        let report = arena.run_round(0);

        assert_eq!(report.spawned, 5);
        assert!(report.decisions > 0);
        for archetype in Archetype::ALL {
            assert!(arena.store().has_weights(archetype), "{archetype}");
        }
    }

    #[test]
    fn rounds_replay_exactly_from_the_seed() {
        let mut a = Arena::new(short_config());
        let mut b = Arena::new(short_config());
        assert_eq!(a.run(2), b.run(2));
        assert_eq!(a.store(), b.store());
    }

    #[test]
    fn round_ends_once_every_elite_is_dead() {
        let mut config = short_config();
        config.max_round_seconds = 120.0;
        config.obstacles.clear();
        config.player.damage = 1.0e6;
        config.player.range = 1.0e5;
        config.player.attack_interval = 0.01;
        config.roster = vec![RosterEntry {
            archetype: Archetype::Bruiser,
            count: 3,
        }];

        let mut arena = Arena::new(config);
        let report = arena.run_round(0);
        assert_eq!(report.killed, 3);
        assert!(report.player_survived);
        assert!(report.seconds < 1.0);
        assert_eq!(arena.store().len(), 1);
    }

    #[test]
    fn learned_weights_stay_finite_across_many_rounds() {
        let mut arena = Arena::new(ArenaConfig {
            max_round_seconds: 20.0,
            ..ArenaConfig::default()
        });
        arena.run(20);

        assert_eq!(arena.store().len(), Archetype::ALL.len());
        for (archetype, table) in arena.store().tables() {
            for action in CombatAction::ALL {
                for feature in Feature::ALL {
                    let w = table.get(action, feature);
                    assert!(w.is_finite(), "{archetype} {action} {feature:?}: {w}");
                    assert!(w.abs() <= WEIGHT_LIMIT, "{archetype} {action} {feature:?}: {w}");
                }
            }
        }
    }
}
