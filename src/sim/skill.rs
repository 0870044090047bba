//! Skill meters, timed effects and the per-role abilities
//!
//! Each player owns one `SkillMeter` and one `Ability`. The ability is picked
//! once when the player is created and carries that role's effect timers:
//! - `TimeDilation` (role A): one slow-motion window
//! - `EvasionShield` (role B): a shrink window and a one-shot shield window,
//!   armed together but expiring independently

use serde::{Deserialize, Serialize};

use crate::tuning::SkillTuning;

/// Charge accumulator for a player's special ability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMeter {
    charge: u32,
    max: u32,
    ready: bool,
}

impl SkillMeter {
    pub fn new(max: u32) -> Self {
        Self {
            charge: 0,
            max,
            ready: false,
        }
    }

    #[inline]
    pub fn charge(&self) -> u32 {
        self.charge
    }

    #[inline]
    pub fn max(&self) -> u32 {
        self.max
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Fill fraction in [0, 1] for HUD bars
    pub fn ratio(&self) -> f32 {
        if self.max == 0 {
            0.0
        } else {
            self.charge as f32 / self.max as f32
        }
    }

    /// Add charge; no-op once ready
    ///
    /// Returns true on the call that makes the meter ready.
    pub fn add(&mut self, amount: u32) -> bool {
        if self.ready {
            return false;
        }
        self.charge = self.charge.saturating_add(amount).min(self.max);
        if self.charge >= self.max {
            self.ready = true;
            return true;
        }
        false
    }

    /// Spend a full meter. Returns false (and changes nothing) if not ready.
    pub fn consume(&mut self) -> bool {
        if !self.ready {
            return false;
        }
        self.ready = false;
        self.charge = 0;
        true
    }
}

/// A window that is open until a clock deadline
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectTimer {
    active: bool,
    ends_at_ms: f64,
}

impl EffectTimer {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn arm(&mut self, now_ms: f64, duration_ms: f64) {
        self.active = true;
        self.ends_at_ms = now_ms + duration_ms;
    }

    /// Close the window if its deadline has passed; true on that transition
    pub fn expire(&mut self, now_ms: f64) -> bool {
        if self.active && now_ms >= self.ends_at_ms {
            self.active = false;
            return true;
        }
        false
    }

    /// Close the window early
    pub fn consume(&mut self) {
        self.active = false;
    }

    pub fn remaining_ms(&self, now_ms: f64) -> f64 {
        if self.active {
            (self.ends_at_ms - now_ms).max(0.0)
        } else {
            0.0
        }
    }
}

/// Which timed effect a timer drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    SlowMotion,
    Shrink,
    Shield,
}

/// Render-facing view of one effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectStatus {
    pub kind: EffectKind,
    pub active: bool,
    pub remaining_ms: f64,
}

/// Role-specific special ability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Ability {
    /// Slows every arrow and speeds up its owner
    TimeDilation { slow: EffectTimer },
    /// Shrinks its owner and blocks the first fatal hit
    EvasionShield {
        shrink: EffectTimer,
        shield: EffectTimer,
    },
}

impl Ability {
    pub fn time_dilation() -> Self {
        Self::TimeDilation {
            slow: EffectTimer::default(),
        }
    }

    pub fn evasion_shield() -> Self {
        Self::EvasionShield {
            shrink: EffectTimer::default(),
            shield: EffectTimer::default(),
        }
    }

    /// Whether the ability's main window is open (blocks re-triggering)
    pub fn is_active(&self) -> bool {
        match self {
            Self::TimeDilation { slow } => slow.is_active(),
            Self::EvasionShield { shrink, .. } => shrink.is_active(),
        }
    }

    /// Fire the ability, spending the meter
    ///
    /// Only fires while the meter is ready and the ability is not already
    /// running. Returns whether it fired.
    pub fn trigger(&mut self, meter: &mut SkillMeter, now_ms: f64, tuning: &SkillTuning) -> bool {
        if !meter.is_ready() || self.is_active() {
            return false;
        }
        meter.consume();
        match self {
            Self::TimeDilation { slow } => slow.arm(now_ms, tuning.slow_duration_ms),
            Self::EvasionShield { shrink, shield } => {
                shrink.arm(now_ms, tuning.shrink_duration_ms);
                shield.arm(now_ms, tuning.shield_duration_ms);
            }
        }
        true
    }

    /// Close every window whose deadline has passed
    pub fn expire(&mut self, now_ms: f64, mut on_expired: impl FnMut(EffectKind)) {
        match self {
            Self::TimeDilation { slow } => {
                if slow.expire(now_ms) {
                    on_expired(EffectKind::SlowMotion);
                }
            }
            Self::EvasionShield { shrink, shield } => {
                if shrink.expire(now_ms) {
                    on_expired(EffectKind::Shrink);
                }
                if shield.expire(now_ms) {
                    on_expired(EffectKind::Shield);
                }
            }
        }
    }

    /// Multiplier this ability applies to every arrow's velocity
    pub fn arrow_time_scale(&self, tuning: &SkillTuning) -> f32 {
        match self {
            Self::TimeDilation { slow } if slow.is_active() => tuning.slow_factor,
            _ => 1.0,
        }
    }

    /// Multiplier on the owner's movement speed
    pub fn speed_factor(&self, tuning: &SkillTuning) -> f32 {
        match self {
            Self::TimeDilation { slow } if slow.is_active() => tuning.slow_speed_boost,
            _ => 1.0,
        }
    }

    /// Whether the owner should use its reduced radius
    pub fn is_shrunk(&self) -> bool {
        matches!(self, Self::EvasionShield { shrink, .. } if shrink.is_active())
    }

    pub fn shield_active(&self) -> bool {
        matches!(self, Self::EvasionShield { shield, .. } if shield.is_active())
    }

    /// Spend the shield on an otherwise fatal hit; true if it absorbed it
    pub fn intercept(&mut self) -> bool {
        match self {
            Self::EvasionShield { shield, .. } if shield.is_active() => {
                shield.consume();
                true
            }
            _ => false,
        }
    }

    /// Effect flags and remaining durations
    pub fn statuses(&self, now_ms: f64) -> Vec<EffectStatus> {
        let status = |kind, timer: &EffectTimer| EffectStatus {
            kind,
            active: timer.is_active(),
            remaining_ms: timer.remaining_ms(now_ms),
        };
        match self {
            Self::TimeDilation { slow } => vec![status(EffectKind::SlowMotion, slow)],
            Self::EvasionShield { shrink, shield } => vec![
                status(EffectKind::Shrink, shrink),
                status(EffectKind::Shield, shield),
            ],
        }
    }
}
