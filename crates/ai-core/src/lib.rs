//! Deterministic, engine-agnostic primitives shared by the combat brains.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod math;
pub mod rng;
pub mod tick;
pub mod world;

pub use agent::{sort_by_stable_id, AgentId};
pub use math::Vec2;
pub use rng::{DeterministicRng, SplitMix64};
pub use tick::{DecisionCadence, TickContext};
pub use world::{WorldMut, WorldView};
