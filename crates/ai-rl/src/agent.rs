//! The per-agent decision loop.
//!
//! Each step: read vitals, tick effects and timers, resolve a finished
//! windup, perceive, score the previous transition, learn from it, pick and
//! gate the next action, execute it. Every failure mode degrades to a no-op.

use ai_core::rng::derive_seed;
use ai_core::{AgentId, DecisionCadence, SplitMix64, TickContext, Vec2};
use ai_tools::{TraceEvent, TraceLog, TraceRecorder, TraceSink};

use crate::action::{AttackKind, CombatAction, MoveIntent, MOVE_STEP};
use crate::archetype::{Archetype, CombatStats};
use crate::attack::{AttackState, AttackStateMachine, PendingAttack};
use crate::brain::{Exploration, QLearningBrain};
use crate::config::LearningConfig;
use crate::effects::{ActiveEffects, DamageOverTime};
use crate::error::RlError;
use crate::observation::{perceive, AllyFix, CombatClock, Observation, Perception, TargetFix};
use crate::reward::{shaped_reward, GuardGeometry, RewardContext, JUST_ATTACKED_WINDOW};
use crate::store::WeightStore;
use crate::throughput::ThroughputWindow;
use crate::world::{CombatWorldMut, CombatWorldView};

const EXPLORATION_STREAM: u64 = 0x0e11_0001;
const WEIGHT_INIT_STREAM: u64 = 0x0e11_0002;

/// Allies at or above this health fraction are not worth a heal.
pub const HEAL_THRESHOLD: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CombatCounters {
    pub decisions: u64,
    pub explorations: u64,
    pub updates: u64,
    pub attacks_started: u32,
    pub hits: u32,
    pub whiffs: u32,
    pub heals: u32,
    /// Includes damage-over-time ticks.
    pub damage_dealt: f32,
    pub dot_damage: f32,
    pub healing_done: f32,
}

/// How a completed windup ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackResolution<A> {
    Hit { target: A, damage: f32 },
    Healed { target: A, amount: f32 },
    /// The target left range (or died) during the windup.
    Whiff { target: A, kind: AttackKind },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshot {
    pub archetype: Archetype,
    pub attack_state: AttackState,
    pub last_action: Option<CombatAction>,
    pub last_reward: f32,
    pub observation: Observation,
    pub epsilon: f32,
    pub dps: f32,
    pub hps: f32,
    pub steps: u64,
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    observation: Observation,
    action: CombatAction,
    target_distance_units: f32,
}

#[derive(Debug)]
pub struct CombatAgent<A: AgentId> {
    handle: A,
    archetype: Archetype,
    stats: CombatStats,
    config: LearningConfig,
    exploration: Exploration,
    brain: QLearningBrain,
    rng: SplitMix64,
    cadence: DecisionCadence,
    attack: AttackStateMachine<A>,
    effects: ActiveEffects<A>,
    damage_window: ThroughputWindow,
    heal_window: ThroughputWindow,
    clock: CombatClock,
    previous_health: Option<f32>,
    observation: Observation,
    previous: Option<Transition>,
    last_action: Option<CombatAction>,
    last_reward: f32,
    action_held_for: f32,
    stats_poll_timer: f32,
    previous_dps: f32,
    previous_hps: f32,
    steps: u64,
    trace: TraceRecorder,
    counters: CombatCounters,
    last_resolution: Option<AttackResolution<A>>,
}

impl<A: AgentId> CombatAgent<A> {
    /// Attach a brain to `handle`, checking the archetype's weights out of the
    /// store. A never-seen archetype gets a freshly seeded table.
    ///
    /// `config` is trusted; call [`LearningConfig::validate`] at set-up.
    pub fn spawn(
        handle: A,
        archetype: Archetype,
        config: LearningConfig,
        store: &WeightStore,
        seed: u64,
    ) -> Self {
        let id = handle.stable_id();
        let brain = if store.has_weights(archetype) {
            QLearningBrain::new(store.load_weights(archetype))
        } else {
            let mut init = SplitMix64::new(derive_seed(seed, id, WEIGHT_INIT_STREAM));
            tracing::debug!(agent = id, %archetype, "seeding fresh weight table");
            QLearningBrain::fresh(&mut init)
        };

        let stats = archetype.default_stats();
        Self {
            handle,
            archetype,
            stats,
            config,
            exploration: Exploration::new(
                config.epsilon,
                config.epsilon_decay_per_second,
                config.epsilon_floor,
            ),
            brain,
            rng: SplitMix64::new(derive_seed(seed, id, EXPLORATION_STREAM)),
            cadence: DecisionCadence::new(config.decision_interval),
            attack: AttackStateMachine::new(stats.windup_seconds, stats.cooldown_seconds),
            effects: ActiveEffects::new(),
            damage_window: ThroughputWindow::new(config.throughput_window),
            heal_window: ThroughputWindow::new(config.throughput_window),
            clock: CombatClock::default(),
            previous_health: None,
            observation: Observation::default(),
            previous: None,
            last_action: None,
            last_reward: 0.0,
            action_held_for: 0.0,
            // Due on the first step.
            stats_poll_timer: config.stats_poll_interval,
            previous_dps: 0.0,
            previous_hps: 0.0,
            steps: 0,
            trace: TraceRecorder::new(),
            counters: CombatCounters::default(),
            last_resolution: None,
        }
    }

    /// Replace the archetype defaults until the next stats poll.
    pub fn with_stats(mut self, stats: CombatStats) -> Result<Self, RlError> {
        stats.validate()?;
        self.apply_stats(stats);
        Ok(self)
    }

    /// Write the learned table back under the archetype key. Overwrites.
    pub fn retire(self, store: &mut WeightStore) {
        tracing::info!(
            agent = self.handle.stable_id(),
            archetype = %self.archetype,
            steps = self.steps,
            updates = self.counters.updates,
            "retiring agent"
        );
        store.save_weights(self.archetype, self.brain.into_weights());
    }

    pub fn handle(&self) -> A {
        self.handle
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub fn stats(&self) -> &CombatStats {
        &self.stats
    }

    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    pub fn brain(&self) -> &QLearningBrain {
        &self.brain
    }

    pub fn epsilon(&self) -> f32 {
        self.exploration.epsilon
    }

    pub fn attack_state(&self) -> AttackState {
        self.attack.state()
    }

    pub fn observation(&self) -> &Observation {
        &self.observation
    }

    pub fn last_action(&self) -> Option<CombatAction> {
        self.last_action
    }

    pub fn last_reward(&self) -> f32 {
        self.last_reward
    }

    pub fn last_resolution(&self) -> Option<&AttackResolution<A>> {
        self.last_resolution.as_ref()
    }

    pub fn counters(&self) -> &CombatCounters {
        &self.counters
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn dps(&self) -> f32 {
        self.damage_window.rate()
    }

    pub fn hps(&self) -> f32 {
        self.heal_window.rate()
    }

    pub fn is_dot_active_on(&self, target: A) -> bool {
        self.effects.is_active_on(target)
    }

    pub fn enable_trace_log(&mut self) {
        self.trace.enable_log();
    }

    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.trace.set_sink(sink);
    }

    pub fn trace_log(&self) -> Option<&TraceLog> {
        self.trace.log()
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            archetype: self.archetype,
            attack_state: self.attack.state(),
            last_action: self.last_action,
            last_reward: self.last_reward,
            observation: self.observation,
            epsilon: self.exploration.epsilon,
            dps: self.dps(),
            hps: self.hps(),
            steps: self.steps,
        }
    }

    /// Scheduler entry point: runs a step once the decision cadence is due.
    pub fn tick<W>(&mut self, ctx: &TickContext, world: &mut W)
    where
        W: CombatWorldMut<Agent = A>,
    {
        if let Some(dt) = self.cadence.advance(ctx.dt_seconds) {
            self.execute_step(dt, world);
        }
    }

    pub fn execute_step<W>(&mut self, dt: f32, world: &mut W)
    where
        W: CombatWorldMut<Agent = A>,
    {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let Some(vitals) = world.vitals(self.handle) else {
            return;
        };
        if !vitals.is_alive() {
            return;
        }

        let now = world.now_seconds();
        self.steps += 1;
        self.last_resolution = None;
        self.damage_window.prune(now);
        self.heal_window.prune(now);

        self.tick_effects(dt, now, world);
        self.clock.advance(dt);
        if self.previous_health.is_some_and(|h| vitals.health < h) {
            tracing::debug!(
                agent = self.handle.stable_id(),
                health = vitals.health,
                "took damage"
            );
            self.clock.since_damage_taken = 0.0;
        }
        self.previous_health = Some(vitals.health);
        self.exploration.decay(dt);
        self.poll_stats(dt, &*world);

        if let Some(pending) = self.attack.advance(dt) {
            self.resolve_attack(pending, now, world);
        }

        let perception = perceive(&*world, self.handle, &self.stats, &self.clock);
        let Some(target) = perception.target else {
            self.observation = perception.observation;
            self.previous = None;
            return;
        };
        let obs = perception.observation;

        let dps = self.damage_window.rate();
        let hps = self.heal_window.rate();
        if let Some(prev) = self.previous {
            let guard = match self.archetype {
                Archetype::Tank => {
                    guard_geometry(&*world, self.handle, perception.self_position, &target)
                }
                _ => None,
            };
            let ctx = RewardContext {
                last_action: prev.action,
                dps,
                previous_dps: self.previous_dps,
                hps,
                previous_hps: self.previous_hps,
                can_attack: self.attack.is_ready(),
                just_attacked: self.clock.since_last_attack < JUST_ATTACKED_WINDOW,
                dot_active: self.effects.is_active_on(target.agent),
                target_distance_units: target.distance,
                previous_target_distance_units: prev.target_distance_units,
                guard,
            };
            let reward = shaped_reward(self.archetype, &prev.observation, &obs, Some(&ctx));
            let td = self.brain.update(
                &prev.observation,
                prev.action,
                reward,
                &obs,
                self.config.alpha,
                self.config.gamma,
            );
            self.last_reward = reward;
            self.counters.updates += 1;
            tracing::trace!(
                agent = self.handle.stable_id(),
                action = %prev.action,
                reward,
                td_error = td.td_error,
                "td update"
            );
            self.emit("reward", 0, reward);
            self.emit("td_error", prev.action.index() as u64, td.td_error);
        }
        self.previous_dps = dps;
        self.previous_hps = hps;

        let selection = self
            .brain
            .select_action(&obs, self.exploration.epsilon, &mut self.rng);
        self.counters.decisions += 1;
        if selection.explored {
            self.counters.explorations += 1;
        }
        self.emit("decide", selection.action.index() as u64, selection.q);

        let action = self.gate(selection.action, dt);
        self.execute_action(action, &perception, &target, world);

        self.previous = Some(Transition {
            observation: obs,
            action,
            target_distance_units: target.distance,
        });
        self.observation = obs;
        self.last_action = Some(action);
    }

    /// Substitute attacks while the attack machine is busy, then hold a
    /// movement action for at least `min_action_duration`.
    fn gate(&mut self, chosen: CombatAction, dt: f32) -> CombatAction {
        let mut action = chosen;
        if action.is_attack() && !self.attack.is_ready() {
            action = CombatAction::MoveTowardTarget;
        }

        self.action_held_for += dt;
        if let Some(last) = self.last_action {
            if action.is_movement()
                && last.is_movement()
                && action != last
                && self.action_held_for < self.config.min_action_duration
            {
                action = last;
            }
        }
        if Some(action) != self.last_action {
            self.action_held_for = 0.0;
        }
        action
    }

    fn execute_action<W>(
        &mut self,
        action: CombatAction,
        perception: &Perception<A>,
        target: &TargetFix<A>,
        world: &mut W,
    ) where
        W: CombatWorldMut<Agent = A>,
    {
        let Some(kind) = action.attack_kind() else {
            let goal = action.movement_goal(perception.self_position, target.position, MOVE_STEP);
            if let Some(goal) = goal {
                world.move_to(self.handle, MoveIntent::new(goal));
            }
            return;
        };

        let pending = if kind == AttackKind::Secondary && self.archetype.secondary_heals() {
            match self.pick_heal_target(&perception.allies) {
                Some(ally) => PendingAttack::heal(ally.agent, ally.position),
                None => return,
            }
        } else {
            PendingAttack::strike(kind, target.agent, target.position)
        };

        // Heals also require the fight target in range; the ally range check
        // happened in `pick_heal_target`.
        let in_range = !perception.observation.beyond_max_range;
        if self.attack.try_begin(pending, in_range) {
            self.clock.since_last_attack = 0.0;
            self.counters.attacks_started += 1;
            self.emit("attack_start", pending.target.stable_id(), 0.0);
        }
    }

    /// Lowest-health ally below the heal threshold and within range.
    fn pick_heal_target<'a>(&self, allies: &'a [AllyFix<A>]) -> Option<&'a AllyFix<A>> {
        allies
            .iter()
            .filter(|a| a.health < HEAL_THRESHOLD && a.distance <= self.stats.max_attack_range)
            .min_by(|a, b| a.health.total_cmp(&b.health))
    }

    fn resolve_attack<W>(&mut self, pending: PendingAttack<A>, now: f32, world: &mut W)
    where
        W: CombatWorldMut<Agent = A>,
    {
        let target = pending.target;
        let alive = world.vitals(target).is_some_and(|v| v.is_alive());
        let in_range = match (world.position(self.handle), world.position(target)) {
            (Some(me), Some(them)) => me.distance(them) <= self.stats.max_attack_range,
            _ => false,
        };

        if !alive || !in_range {
            self.counters.whiffs += 1;
            tracing::debug!(
                agent = self.handle.stable_id(),
                target = target.stable_id(),
                alive,
                "attack missed"
            );
            self.emit("attack_whiff", target.stable_id(), 0.0);
            self.last_resolution = Some(AttackResolution::Whiff {
                target,
                kind: pending.kind,
            });
            return;
        }

        if pending.is_heal {
            let amount = self.stats.heal_amount;
            world.report_heal(target, amount, self.handle);
            self.heal_window.record(now, amount);
            self.counters.heals += 1;
            self.counters.healing_done += amount;
            tracing::debug!(
                agent = self.handle.stable_id(),
                ally = target.stable_id(),
                amount,
                "heal landed"
            );
            self.emit("heal", target.stable_id(), amount);
            self.last_resolution = Some(AttackResolution::Healed { target, amount });
            return;
        }

        let damage = self.stats.attack_damage;
        world.report_damage(target, damage, self.handle);
        self.damage_window.record(now, damage);
        self.counters.hits += 1;
        self.counters.damage_dealt += damage;
        if self.archetype.poisons_on_hit() {
            self.effects.apply(target, DamageOverTime::poison());
        }
        tracing::debug!(
            agent = self.handle.stable_id(),
            target = target.stable_id(),
            damage,
            "attack hit"
        );
        self.emit("attack_hit", target.stable_id(), damage);
        self.last_resolution = Some(AttackResolution::Hit { target, damage });
    }

    fn tick_effects<W>(&mut self, dt: f32, now: f32, world: &mut W)
    where
        W: CombatWorldMut<Agent = A>,
    {
        for (target, damage) in self.effects.advance(dt) {
            if !world.vitals(target).is_some_and(|v| v.is_alive()) {
                continue;
            }
            world.report_damage(target, damage, self.handle);
            self.damage_window.record(now, damage);
            self.counters.damage_dealt += damage;
            self.counters.dot_damage += damage;
            self.emit("dot_tick", target.stable_id(), damage);
        }
    }

    fn poll_stats<W>(&mut self, dt: f32, world: &W)
    where
        W: CombatWorldView<Agent = A>,
    {
        self.stats_poll_timer += dt;
        if self.stats_poll_timer < self.config.stats_poll_interval {
            return;
        }
        self.stats_poll_timer = 0.0;
        let Some(stats) = world.combat_stats(self.handle) else {
            return;
        };
        match stats.validate() {
            Ok(()) => self.apply_stats(stats),
            Err(e) => tracing::warn!(
                agent = self.handle.stable_id(),
                error = %e,
                "ignoring invalid stat override"
            ),
        }
    }

    fn apply_stats(&mut self, stats: CombatStats) {
        self.stats = stats;
        self.attack.set_timings(stats.windup_seconds, stats.cooldown_seconds);
    }

    fn emit(&mut self, tag: &'static str, code: u64, value: f32) {
        if self.trace.is_enabled() {
            self.trace.emit(
                TraceEvent::new(self.steps, self.handle, tag)
                    .with_code(code)
                    .with_value(value),
            );
        }
    }
}

/// Where a bodyguard stands relative to the nearest living support and the
/// target. `None` when the team has no living support.
pub fn guard_geometry<W: CombatWorldView>(
    world: &W,
    me: W::Agent,
    my_position: Vec2,
    target: &TargetFix<W::Agent>,
) -> Option<GuardGeometry> {
    let ward = world
        .teammates(me)
        .into_iter()
        .filter(|&a| a != me && world.archetype_of(a) == Some(Archetype::Support))
        .filter(|&a| world.vitals(a).is_some_and(|v| v.is_alive()))
        .filter_map(|a| world.position(a))
        .min_by(|a, b| my_position.distance(*a).total_cmp(&my_position.distance(*b)))?;

    Some(GuardGeometry {
        self_to_ward: my_position.distance(ward),
        target_to_ward: target.position.distance(ward),
        self_to_target: target.distance,
    })
}
