use crate::{rng, AgentId, SplitMix64};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
    pub seed: u64,
}

impl TickContext {
    pub fn rng_for_agent<A: AgentId>(&self, agent: A, stream: u64) -> SplitMix64 {
        let seed = rng::derive_seed(self.seed, agent.stable_id(), stream);
        SplitMix64::new(seed)
    }
}

/// Time-based think cadence.
///
/// The scheduler ticks every frame; a brain only decides once the accumulated
/// time reaches `interval_seconds`, and is handed the whole accumulated delta.
/// An interval of zero decides on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DecisionCadence {
    pub interval_seconds: f32,
    accumulated: f32,
}

impl DecisionCadence {
    pub fn new(interval_seconds: f32) -> Self {
        Self {
            interval_seconds: interval_seconds.max(0.0),
            accumulated: 0.0,
        }
    }

    /// Feed one frame. Returns the delta to decide with when a decision is due.
    pub fn advance(&mut self, dt_seconds: f32) -> Option<f32> {
        let dt = dt_seconds.max(0.0);
        if self.interval_seconds <= 0.0 {
            return Some(dt);
        }

        self.accumulated += dt;
        if self.accumulated >= self.interval_seconds {
            let due = self.accumulated;
            self.accumulated = 0.0;
            Some(due)
        } else {
            None
        }
    }

    pub fn pending_seconds(&self) -> f32 {
        self.accumulated
    }
}
