//! Online reinforcement-learning combat brains.
//!
//! Each agent observes a normalized feature vector per decision tick, scores
//! six discrete actions with a linear Q-function, acts epsilon-greedily, and
//! learns from shaped rewards with TD(0). Learned tables are keyed by
//! [`Archetype`] and handed from dying agents to their successors through the
//! [`WeightStore`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod agent;
pub mod archetype;
pub mod attack;
pub mod brain;
pub mod config;
pub mod effects;
pub mod error;
pub mod features;
pub mod observation;
pub mod reward;
pub mod store;
pub mod throughput;
pub mod weights;
pub mod world;

pub use action::{AttackKind, CombatAction, MoveIntent};
pub use agent::{guard_geometry, AgentSnapshot, AttackResolution, CombatAgent, CombatCounters};
pub use archetype::{Archetype, CombatStats};
pub use attack::{AttackState, AttackStateMachine, PendingAttack};
pub use brain::{Exploration, QLearningBrain, Selection, TdUpdate};
pub use config::LearningConfig;
pub use effects::{ActiveEffects, DamageOverTime};
pub use error::RlError;
pub use features::{Feature, FeatureVector};
pub use observation::{perceive, AllySlot, CombatClock, Observation, Perception};
pub use reward::{reward_breakdown, shaped_reward, GuardGeometry, RewardBreakdown, RewardContext};
pub use store::WeightStore;
pub use throughput::ThroughputWindow;
pub use weights::WeightTable;
pub use world::{CombatWorldMut, CombatWorldView, Vitals};
