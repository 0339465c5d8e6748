use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{check_non_negative, check_positive};
use crate::RlError;

/// Enemy roles. Learned weights are shared and persisted per archetype, never
/// per agent instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Archetype {
    /// Ranged; keeps distance while shooting.
    Kiter,
    /// Melee burst; dives in, poisons, retreats.
    Striker,
    /// Bodyguard; stands between the target and the team's support.
    Tank,
    /// Healer; stays far from the target but close to wounded allies.
    Support,
    /// Slow heavy hitter; holds the front line.
    Bruiser,
}

impl Archetype {
    pub const ALL: [Archetype; 5] = [
        Archetype::Kiter,
        Archetype::Striker,
        Archetype::Tank,
        Archetype::Support,
        Archetype::Bruiser,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Archetype::Kiter => "kiter",
            Archetype::Striker => "striker",
            Archetype::Tank => "tank",
            Archetype::Support => "support",
            Archetype::Bruiser => "bruiser",
        }
    }

    pub fn default_stats(self) -> CombatStats {
        match self {
            Archetype::Kiter => CombatStats {
                attack_damage: 50.0,
                max_attack_range: 2000.0,
                windup_seconds: 0.1,
                cooldown_seconds: 0.4,
                movement_speed: 450.0,
                heal_amount: 0.0,
                max_health: 90.0,
            },
            Archetype::Striker => CombatStats {
                attack_damage: 40.0,
                max_attack_range: 250.0,
                windup_seconds: 0.2,
                cooldown_seconds: 1.2,
                movement_speed: 550.0,
                heal_amount: 0.0,
                max_health: 100.0,
            },
            Archetype::Tank => CombatStats {
                attack_damage: 35.0,
                max_attack_range: 500.0,
                windup_seconds: 0.05,
                cooldown_seconds: 0.3,
                movement_speed: 350.0,
                heal_amount: 0.0,
                max_health: 150.0,
            },
            Archetype::Support => CombatStats {
                attack_damage: 10.0,
                max_attack_range: 1200.0,
                windup_seconds: 0.3,
                cooldown_seconds: 1.0,
                movement_speed: 400.0,
                heal_amount: 50.0,
                max_health: 100.0,
            },
            Archetype::Bruiser => CombatStats {
                attack_damage: 200.0,
                max_attack_range: 600.0,
                windup_seconds: 0.1,
                cooldown_seconds: 1.9,
                movement_speed: 250.0,
                heal_amount: 0.0,
                max_health: 250.0,
            },
        }
    }

    /// Whether a landed strike attaches a damage-over-time effect.
    pub fn poisons_on_hit(self) -> bool {
        matches!(self, Archetype::Striker)
    }

    /// Whether the secondary attack heals an ally instead of striking.
    pub fn secondary_heals(self) -> bool {
        matches!(self, Archetype::Support)
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Archetype {
    type Err = RlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kiter" | "archer" => Ok(Archetype::Kiter),
            "striker" | "assassin" => Ok(Archetype::Striker),
            "tank" | "paladin" => Ok(Archetype::Tank),
            "support" | "healer" => Ok(Archetype::Support),
            "bruiser" | "giant" => Ok(Archetype::Bruiser),
            _ => Err(RlError::UnknownArchetype(s.to_string())),
        }
    }
}

/// Stats every combat-capable entity exposes to the brain.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CombatStats {
    pub attack_damage: f32,
    /// World units. Also the normalizer for the distance-to-target feature.
    pub max_attack_range: f32,
    pub windup_seconds: f32,
    pub cooldown_seconds: f32,
    pub movement_speed: f32,
    pub heal_amount: f32,
    pub max_health: f32,
}

impl CombatStats {
    pub fn validate(&self) -> Result<(), RlError> {
        check_non_negative("attack_damage", self.attack_damage)?;
        check_positive("max_attack_range", self.max_attack_range)?;
        check_non_negative("windup_seconds", self.windup_seconds)?;
        check_non_negative("cooldown_seconds", self.cooldown_seconds)?;
        check_non_negative("movement_speed", self.movement_speed)?;
        check_non_negative("heal_amount", self.heal_amount)?;
        check_positive("max_health", self.max_health)?;
        Ok(())
    }
}

impl Default for CombatStats {
    fn default() -> Self {
        Self {
            attack_damage: 10.0,
            max_attack_range: 500.0,
            windup_seconds: 0.3,
            cooldown_seconds: 0.5,
            movement_speed: 400.0,
            heal_amount: 0.0,
            max_health: 100.0,
        }
    }
}
