//! Windup / cooldown gating for attacks.
//!
//! `Normal -> Attacking -> OnCooldown -> Normal`, advanced by accumulated
//! delta time. One transition per [`AttackStateMachine::advance`]; the timer
//! restarts from zero on every transition.

use ai_core::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::action::AttackKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AttackState {
    #[default]
    Normal,
    Attacking,
    OnCooldown,
}

impl AttackState {
    pub fn name(self) -> &'static str {
        match self {
            AttackState::Normal => "normal",
            AttackState::Attacking => "attacking",
            AttackState::OnCooldown => "on_cooldown",
        }
    }
}

/// What was started and against whom, kept until the windup resolves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingAttack<A> {
    pub kind: AttackKind,
    /// The enemy struck, or the ally healed.
    pub target: A,
    /// Target location when the windup began.
    pub target_snapshot: Vec2,
    pub is_heal: bool,
}

impl<A> PendingAttack<A> {
    pub fn strike(kind: AttackKind, target: A, at: Vec2) -> Self {
        Self {
            kind,
            target,
            target_snapshot: at,
            is_heal: false,
        }
    }

    pub fn heal(target: A, at: Vec2) -> Self {
        Self {
            kind: AttackKind::Secondary,
            target,
            target_snapshot: at,
            is_heal: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttackStateMachine<A> {
    state: AttackState,
    timer: f32,
    windup: f32,
    cooldown: f32,
    pending: Option<PendingAttack<A>>,
}

impl<A: Copy> AttackStateMachine<A> {
    pub fn new(windup: f32, cooldown: f32) -> Self {
        Self {
            state: AttackState::Normal,
            timer: 0.0,
            windup: windup.max(0.0),
            cooldown: cooldown.max(0.0),
            pending: None,
        }
    }

    /// Applies to the next windup / cooldown; a running timer keeps counting.
    pub fn set_timings(&mut self, windup: f32, cooldown: f32) {
        self.windup = windup.max(0.0);
        self.cooldown = cooldown.max(0.0);
    }

    pub fn state(&self) -> AttackState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == AttackState::Normal
    }

    pub fn pending(&self) -> Option<&PendingAttack<A>> {
        self.pending.as_ref()
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Start a windup. Refused unless `Normal` and the target is in range.
    pub fn try_begin(&mut self, attack: PendingAttack<A>, in_range: bool) -> bool {
        if !self.is_ready() || !in_range {
            return false;
        }
        self.state = AttackState::Attacking;
        self.timer = 0.0;
        self.pending = Some(attack);
        true
    }

    /// Advance timers. Returns the attack whose windup completed during this
    /// call, exactly once per started attack. The caller re-checks range and
    /// resolves it as a hit or a whiff; either way the machine is already on
    /// cooldown.
    pub fn advance(&mut self, dt: f32) -> Option<PendingAttack<A>> {
        match self.state {
            AttackState::Normal => None,
            AttackState::Attacking => {
                self.timer += dt;
                if self.timer >= self.windup {
                    self.state = AttackState::OnCooldown;
                    self.timer = 0.0;
                    self.pending.take()
                } else {
                    None
                }
            }
            AttackState::OnCooldown => {
                self.timer += dt;
                if self.timer >= self.cooldown {
                    self.state = AttackState::Normal;
                    self.timer = 0.0;
                }
                None
            }
        }
    }
}
