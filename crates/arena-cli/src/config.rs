//! Arena configuration, loaded from YAML.

use std::path::Path;

use ai_rl::{Archetype, LearningConfig};
use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Rounds to play when `--rounds` is not given
    pub rounds: u32,

    /// Master seed for spawns and exploration
    pub seed: u64,

    /// Fixed simulation step in seconds
    pub tick_seconds: f32,

    /// A round ends after this long even if nobody died
    pub max_round_seconds: f32,

    /// Radius of the circular arena, centered on the origin
    pub arena_radius: f32,

    /// Elites spawn on a ring of this radius around the player
    pub spawn_radius: f32,

    pub player: PlayerConfig,

    pub roster: Vec<RosterEntry>,

    /// Circular line-of-sight blockers
    pub obstacles: Vec<Obstacle>,

    pub learning: LearningConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub health: f32,
    pub damage: f32,
    pub range: f32,
    pub attack_interval: f32,
    /// The player circles the arena center at this radius
    pub orbit_radius: f32,
    /// Radians per second
    pub orbit_speed: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub archetype: Archetype,
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// Step size for the arena. Fourteen features in [0, 1] and rewards in the
/// tens make larger steps oscillate and blow up.
const ARENA_ALPHA: f32 = 0.02;

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            rounds: 10,
            seed: 0,
            tick_seconds: 0.1,
            max_round_seconds: 60.0,
            arena_radius: 4000.0,
            spawn_radius: 2500.0,
            player: PlayerConfig::default(),
            roster: Archetype::ALL
                .iter()
                .map(|&archetype| RosterEntry {
                    archetype,
                    count: 1,
                })
                .collect(),
            obstacles: vec![
                Obstacle {
                    x: 1200.0,
                    y: 0.0,
                    radius: 250.0,
                },
                Obstacle {
                    x: -800.0,
                    y: 900.0,
                    radius: 300.0,
                },
            ],
            learning: LearningConfig {
                alpha: ARENA_ALPHA,
                ..LearningConfig::default()
            },
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            health: 2500.0,
            damage: 60.0,
            range: 900.0,
            attack_interval: 0.8,
            orbit_radius: 600.0,
            orbit_speed: 0.4,
        }
    }
}

impl ArenaConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.learning.validate()?;
        ensure!(self.tick_seconds > 0.0, "tick_seconds must be positive");
        ensure!(
            self.max_round_seconds >= self.tick_seconds,
            "max_round_seconds must cover at least one tick"
        );
        ensure!(self.arena_radius > 0.0, "arena_radius must be positive");
        ensure!(self.player.health > 0.0, "player.health must be positive");
        ensure!(
            self.player.attack_interval > 0.0,
            "player.attack_interval must be positive"
        );
        ensure!(
            self.roster.iter().any(|e| e.count > 0),
            "roster must spawn at least one elite"
        );
        Ok(())
    }

    pub fn elites_per_round(&self) -> u32 {
        self.roster.iter().map(|e| e.count).sum()
    }
}

pub const DEFAULT_CONFIG: &str = r#"# Arena configuration

rounds: 10
seed: 0
tick_seconds: 0.1
max_round_seconds: 60.0
arena_radius: 4000.0
spawn_radius: 2500.0

player:
  health: 2500.0
  damage: 60.0
  range: 900.0
  attack_interval: 0.8
  orbit_radius: 600.0
  orbit_speed: 0.4

# One entry per archetype: kiter, striker, tank, support, bruiser
roster:
  - archetype: kiter
  - archetype: striker
  - archetype: tank
  - archetype: support
  - archetype: bruiser

obstacles:
  - { x: 1200.0, y: 0.0, radius: 250.0 }
  - { x: -800.0, y: 900.0, radius: 300.0 }

learning:
  alpha: 0.02
  gamma: 0.95
  epsilon: 0.2
  epsilon_decay_per_second: 0.0
  epsilon_floor: 0.01
  min_action_duration: 0.3
  decision_interval: 0.0
  stats_poll_interval: 1.0
  throughput_window: 5.0
"#;
