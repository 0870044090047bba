//! Dodge Arrow - a two-player arrow dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (arrows, collisions, skills, round state)
//! - `tuning`: Data-driven game balance, validated once per session
//! - `persistence`: Best-effort "skill ready" notifications

pub mod persistence;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Play area (the arena below the HUD strip)
    pub const ARENA_WIDTH: f32 = 1200.0;
    pub const ARENA_HEIGHT: f32 = 280.0;
    /// Half-width of the no-spawn band around the divider
    pub const DIVIDER_BUFFER: f32 = 50.0;
    /// Half-width of the band where arrows are never allowed to appear
    pub const DIVIDER_DEAD_ZONE: f32 = 10.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 16.0;
    pub const PLAYER_RADIUS_SMALL: f32 = 9.0;
    /// Pixels per second
    pub const PLAYER_SPEED: f32 = 300.0;

    /// Arrow speed range (pixels per second)
    pub const ARROW_MIN_SPEED: f32 = 180.0;
    pub const ARROW_MAX_SPEED: f32 = 360.0;
    /// Arrow body (shaft + fletching) and tip lengths
    pub const ARROW_BODY_LENGTH: f32 = 150.0;
    pub const ARROW_TIP_LENGTH: f32 = 26.0;
    pub const ARROW_BODY_HALF_WIDTH: f32 = 4.0;
    pub const ARROW_TIP_HALF_WIDTH: f32 = 9.0;
    /// Tip point = position + dir * (body * 0.55 + tip * 0.6)
    pub const ARROW_HEAD_BODY_RATIO: f32 = 0.55;
    pub const ARROW_HEAD_TIP_RATIO: f32 = 0.6;
    /// Arrows further than this outside the arena are retired
    pub const ARROW_OFFSCREEN_PAD: f32 = 120.0;

    /// Spawner defaults (milliseconds)
    pub const SPAWN_INTERVAL_INIT_MS: f64 = 800.0;
    pub const SPAWN_INTERVAL_MIN_MS: f64 = 260.0;
    pub const SPAWN_RAMP_FACTOR: f64 = 0.9;
    pub const SPAWN_RAMP_EVERY: u32 = 12;
    pub const SPAWN_EDGE_MARGIN: f32 = 20.0;
    pub const SPAWN_AIM_JITTER: f32 = 80.0;
    pub const SPAWN_MAX_ATTEMPTS: u32 = 8;

    /// Role A: score per graze and per-arrow cooldown
    pub const GRAZE_SCORE: u32 = 1;
    pub const GRAZE_COOLDOWN_MS: f64 = 450.0;

    /// Role B: proximity thresholds, near to far (levels 3, 2, 1)
    pub const PROXIMITY_THRESHOLDS: [f32; 3] = [55.0, 85.0, 120.0];

    /// Skill meters
    pub const SKILL_METER_MAX_A: u32 = 15;
    pub const SKILL_METER_MAX_B: u32 = 20;
    pub const SLOW_DURATION_MS: f64 = 7000.0;
    pub const SLOW_FACTOR: f32 = 0.25;
    pub const SLOW_SPEED_BOOST: f32 = 1.5;
    pub const SHRINK_DURATION_MS: f64 = 10000.0;
    pub const SHIELD_DURATION_MS: f64 = 5000.0;

    /// Combined score needed to win a round
    pub const WIN_SCORE_THRESHOLD: u32 = 50;
    /// Pause between a finished round and the next one
    pub const GAME_OVER_DELAY_MS: f64 = 2000.0;
    /// Points between fight-scene attack cues
    pub const SPECIAL_MOVE_EVERY: u32 = 5;
}

/// Unit vector from a movement intent, zero for "no input"
#[inline]
pub fn intent_direction(raw: Vec2) -> Vec2 {
    raw.normalize_or_zero()
}

/// Heading angle of a direction vector in degrees
#[inline]
pub fn heading_degrees(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x).to_degrees()
}
