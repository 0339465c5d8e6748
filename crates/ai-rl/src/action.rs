use core::fmt;

use ai_core::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How far a single movement intent reaches from the agent's position.
pub const MOVE_STEP: f32 = 200.0;
/// Acceptance radius handed to the movement collaborator.
pub const MOVE_ACCEPTANCE_RADIUS: f32 = 50.0;

/// The closed set of decisions a combat brain can make.
///
/// Declaration order is significant: it is the enumeration order used for
/// greedy tie-breaks and the index space used for exploration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CombatAction {
    MoveTowardTarget,
    MoveAwayFromTarget,
    StrafeLeft,
    StrafeRight,
    PrimaryAttack,
    SecondaryAttack,
}

impl CombatAction {
    pub const COUNT: usize = 6;

    pub const ALL: [CombatAction; Self::COUNT] = [
        CombatAction::MoveTowardTarget,
        CombatAction::MoveAwayFromTarget,
        CombatAction::StrafeLeft,
        CombatAction::StrafeRight,
        CombatAction::PrimaryAttack,
        CombatAction::SecondaryAttack,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn is_attack(self) -> bool {
        matches!(
            self,
            CombatAction::PrimaryAttack | CombatAction::SecondaryAttack
        )
    }

    pub fn is_movement(self) -> bool {
        !self.is_attack()
    }

    pub fn attack_kind(self) -> Option<AttackKind> {
        match self {
            CombatAction::PrimaryAttack => Some(AttackKind::Primary),
            CombatAction::SecondaryAttack => Some(AttackKind::Secondary),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CombatAction::MoveTowardTarget => "move_toward_target",
            CombatAction::MoveAwayFromTarget => "move_away_from_target",
            CombatAction::StrafeLeft => "strafe_left",
            CombatAction::StrafeRight => "strafe_right",
            CombatAction::PrimaryAttack => "primary_attack",
            CombatAction::SecondaryAttack => "secondary_attack",
        }
    }

    /// Destination for a movement action, one `step` away from `origin`.
    ///
    /// Strafing is perpendicular to the line towards the target. Returns
    /// `None` for attacks.
    pub fn movement_goal(self, origin: Vec2, target: Vec2, step: f32) -> Option<Vec2> {
        let forward = (target - origin).normalize_or_zero();
        let right = forward.right_perp();
        let dir = match self {
            CombatAction::MoveTowardTarget => forward,
            CombatAction::MoveAwayFromTarget => -forward,
            CombatAction::StrafeLeft => -right,
            CombatAction::StrafeRight => right,
            CombatAction::PrimaryAttack | CombatAction::SecondaryAttack => return None,
        };
        Some(origin + dir * step)
    }
}

impl fmt::Display for CombatAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AttackKind {
    Primary,
    Secondary,
}

/// Abstract movement request for the movement-execution collaborator.
///
/// The brain never computes paths; it only says where it would like to be.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveIntent {
    pub destination: Vec2,
    pub acceptance_radius: f32,
}

impl MoveIntent {
    pub fn new(destination: Vec2) -> Self {
        Self {
            destination,
            acceptance_radius: MOVE_ACCEPTANCE_RADIUS,
        }
    }
}
