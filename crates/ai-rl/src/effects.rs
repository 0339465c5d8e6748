//! Damage-over-time effects an agent has attached to others.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DamageOverTime {
    pub ticks_left: u32,
    pub damage_per_tick: f32,
    pub tick_interval: f32,
    pub since_last_tick: f32,
}

impl DamageOverTime {
    pub fn new(total_damage: f32, duration: f32, tick_interval: f32) -> Self {
        let ticks = if tick_interval > 0.0 {
            (duration / tick_interval).round().max(1.0)
        } else {
            1.0
        };
        Self {
            ticks_left: ticks as u32,
            damage_per_tick: total_damage / ticks,
            tick_interval: tick_interval.max(0.0),
            since_last_tick: 0.0,
        }
    }

    /// Striker poison: 90 damage over 3 s, every 0.5 s.
    pub fn poison() -> Self {
        Self::new(90.0, 3.0, 0.5)
    }

    pub fn is_expired(&self) -> bool {
        self.ticks_left == 0
    }

    /// Accumulate `dt` and return how many ticks came due. Time past a tick
    /// carries over, so a large `dt` fires several ticks at once.
    fn advance(&mut self, dt: f32) -> u32 {
        self.since_last_tick += dt;
        let mut fired = 0;
        while self.ticks_left > 0 && self.since_last_tick >= self.tick_interval {
            self.since_last_tick -= self.tick_interval;
            self.ticks_left -= 1;
            fired += 1;
        }
        fired
    }
}

/// Effects keyed by the afflicted entity. One effect per target; re-applying
/// refreshes it.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveEffects<A> {
    effects: Vec<(A, DamageOverTime)>,
}

impl<A> Default for ActiveEffects<A> {
    fn default() -> Self {
        Self {
            effects: Vec::new(),
        }
    }
}

impl<A: Copy + PartialEq> ActiveEffects<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, target: A, effect: DamageOverTime) {
        match self.effects.iter_mut().find(|(t, _)| *t == target) {
            Some((_, existing)) => *existing = effect,
            None => self.effects.push((target, effect)),
        }
    }

    pub fn is_active_on(&self, target: A) -> bool {
        self.effects.iter().any(|(t, _)| *t == target)
    }

    pub fn is_active(&self) -> bool {
        !self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Advance every effect and return the ticks that fired as
    /// `(target, damage)`. Expired effects are dropped.
    pub fn advance(&mut self, dt: f32) -> Vec<(A, f32)> {
        let mut ticks = Vec::new();
        for (target, dot) in &mut self.effects {
            for _ in 0..dot.advance(dt) {
                ticks.push((*target, dot.damage_per_tick));
            }
        }
        self.effects.retain(|(_, dot)| !dot.is_expired());
        ticks
    }
}
