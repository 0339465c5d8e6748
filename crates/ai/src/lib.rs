//! Umbrella crate that re-exports the `ai-*` building blocks.
//!
//! Enable only the layers you need; `full` (the default) pulls in everything.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use ai_core as core;

#[cfg(feature = "tools")]
#[cfg_attr(docsrs, doc(cfg(feature = "tools")))]
pub use ai_tools as tools;

#[cfg(feature = "rl")]
#[cfg_attr(docsrs, doc(cfg(feature = "rl")))]
pub use ai_rl as rl;

/// The types most hosts need to drive combat brains.
#[cfg(feature = "rl")]
#[cfg_attr(docsrs, doc(cfg(feature = "rl")))]
pub mod prelude {
    pub use ai_core::{AgentId, TickContext, Vec2, WorldMut, WorldView};
    pub use ai_rl::{
        Archetype, CombatAction, CombatAgent, CombatStats, CombatWorldMut, CombatWorldView,
        LearningConfig, MoveIntent, Vitals, WeightStore,
    };
}
