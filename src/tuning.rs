//! Data-driven game balance
//!
//! One `Tuning` is fixed for the whole session. It is loaded from JSON (any
//! missing field falls back to the defaults in `crate::consts`) and must pass
//! `validate()` before a round can be built.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected configuration
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f64 },
    #[error("divider buffer {buffer} is narrower than the dead zone {dead_zone}")]
    BufferNarrowerThanDeadZone { buffer: f32, dead_zone: f32 },
    #[error("divider buffer {buffer} does not fit in an arena {width} wide")]
    BufferTooWide { buffer: f32, width: f32 },
    #[error("reduced radius {reduced} exceeds normal radius {normal}")]
    ReducedRadiusTooLarge { reduced: f32, normal: f32 },
    #[error("arrow speed range is inverted: max {max} < min {min}")]
    SpeedRange { min: f32, max: f32 },
    #[error("{name} must be in {range} (got {value})")]
    OutOfRange {
        name: &'static str,
        range: &'static str,
        value: f64,
    },
    #[error("spawn floor {floor} ms is above the initial interval {initial} ms")]
    SpawnFloorAboveInitial { floor: f64, initial: f64 },
    #[error("{name} must be a finite value of at least zero (got {value})")]
    Negative { name: &'static str, value: f64 },
    #[error("off-arena padding {pad} is inside the spawn margin {margin}")]
    PadInsideSpawnMargin { pad: f32, margin: f32 },
    #[error("proximity thresholds must strictly increase from near to far: {0:?}")]
    ThresholdsOutOfOrder([f32; 3]),
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    pub width: f32,
    pub height: f32,
    /// Half-width of the no-spawn band centered on the divider
    pub divider_buffer: f32,
    /// Half-width of the inner band where a spawn is rerolled
    pub dead_zone: f32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            divider_buffer: DIVIDER_BUFFER,
            dead_zone: DIVIDER_DEAD_ZONE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub radius_a: f32,
    pub radius_b: f32,
    /// Role B's radius while shrunk
    pub radius_b_small: f32,
    pub speed_a: f32,
    pub speed_b: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            radius_a: PLAYER_RADIUS,
            radius_b: PLAYER_RADIUS,
            radius_b_small: PLAYER_RADIUS_SMALL,
            speed_a: PLAYER_SPEED,
            speed_b: PLAYER_SPEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowTuning {
    pub min_speed: f32,
    pub max_speed: f32,
    pub body_length: f32,
    pub tip_length: f32,
    pub body_half_width: f32,
    pub tip_half_width: f32,
    pub head_body_ratio: f32,
    pub head_tip_ratio: f32,
    pub offscreen_pad: f32,
    pub graze_cooldown_ms: f64,
    pub graze_score: u32,
    /// Near to far: distances for proximity levels 3, 2 and 1
    pub proximity_thresholds: [f32; 3],
}

impl Default for ArrowTuning {
    fn default() -> Self {
        Self {
            min_speed: ARROW_MIN_SPEED,
            max_speed: ARROW_MAX_SPEED,
            body_length: ARROW_BODY_LENGTH,
            tip_length: ARROW_TIP_LENGTH,
            body_half_width: ARROW_BODY_HALF_WIDTH,
            tip_half_width: ARROW_TIP_HALF_WIDTH,
            head_body_ratio: ARROW_HEAD_BODY_RATIO,
            head_tip_ratio: ARROW_HEAD_TIP_RATIO,
            offscreen_pad: ARROW_OFFSCREEN_PAD,
            graze_cooldown_ms: GRAZE_COOLDOWN_MS,
            graze_score: GRAZE_SCORE,
            proximity_thresholds: PROXIMITY_THRESHOLDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerTuning {
    pub initial_interval_ms: f64,
    pub min_interval_ms: f64,
    pub ramp_factor: f64,
    /// Spawns between two ramp steps
    pub ramp_every: u32,
    pub edge_margin: f32,
    pub aim_jitter: f32,
    pub max_attempts: u32,
}

impl Default for SpawnerTuning {
    fn default() -> Self {
        Self {
            initial_interval_ms: SPAWN_INTERVAL_INIT_MS,
            min_interval_ms: SPAWN_INTERVAL_MIN_MS,
            ramp_factor: SPAWN_RAMP_FACTOR,
            ramp_every: SPAWN_RAMP_EVERY,
            edge_margin: SPAWN_EDGE_MARGIN,
            aim_jitter: SPAWN_AIM_JITTER,
            max_attempts: SPAWN_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillTuning {
    pub meter_max_a: u32,
    pub meter_max_b: u32,
    pub slow_duration_ms: f64,
    /// Multiplier on arrow velocity while time dilation runs
    pub slow_factor: f32,
    /// Multiplier on role A's own speed while time dilation runs
    pub slow_speed_boost: f32,
    pub shrink_duration_ms: f64,
    pub shield_duration_ms: f64,
}

impl Default for SkillTuning {
    fn default() -> Self {
        Self {
            meter_max_a: SKILL_METER_MAX_A,
            meter_max_b: SKILL_METER_MAX_B,
            slow_duration_ms: SLOW_DURATION_MS,
            slow_factor: SLOW_FACTOR,
            slow_speed_boost: SLOW_SPEED_BOOST,
            shrink_duration_ms: SHRINK_DURATION_MS,
            shield_duration_ms: SHIELD_DURATION_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundTuning {
    pub win_score: u32,
    pub game_over_delay_ms: f64,
    pub special_move_every: u32,
}

impl Default for RoundTuning {
    fn default() -> Self {
        Self {
            win_score: WIN_SCORE_THRESHOLD,
            game_over_delay_ms: GAME_OVER_DELAY_MS,
            special_move_every: SPECIAL_MOVE_EVERY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugTuning {
    /// Role A ignores lethal hits (testing aid)
    pub invincible_a: bool,
    /// Start rounds with hitbox display on
    pub show_hitboxes: bool,
}

/// Complete session configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena: ArenaTuning,
    pub players: PlayerTuning,
    pub arrows: ArrowTuning,
    pub spawner: SpawnerTuning,
    pub skills: SkillTuning,
    pub round: RoundTuning,
    pub debug: DebugTuning,
}

fn positive(name: &'static str, value: f64) -> Result<(), TuningError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::NonPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::Negative { name, value })
    }
}

impl Tuning {
    /// Parse tuning from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Check every startup precondition
    pub fn validate(&self) -> Result<(), TuningError> {
        let arena = &self.arena;
        positive("arena.width", arena.width.into())?;
        positive("arena.height", arena.height.into())?;
        positive("arena.dead_zone", arena.dead_zone.into())?;
        if arena.divider_buffer < arena.dead_zone {
            return Err(TuningError::BufferNarrowerThanDeadZone {
                buffer: arena.divider_buffer,
                dead_zone: arena.dead_zone,
            });
        }
        if arena.divider_buffer * 2.0 >= arena.width {
            return Err(TuningError::BufferTooWide {
                buffer: arena.divider_buffer,
                width: arena.width,
            });
        }

        let players = &self.players;
        positive("players.radius_a", players.radius_a.into())?;
        positive("players.radius_b", players.radius_b.into())?;
        positive("players.radius_b_small", players.radius_b_small.into())?;
        positive("players.speed_a", players.speed_a.into())?;
        positive("players.speed_b", players.speed_b.into())?;
        if players.radius_b_small > players.radius_b {
            return Err(TuningError::ReducedRadiusTooLarge {
                reduced: players.radius_b_small,
                normal: players.radius_b,
            });
        }

        let arrows = &self.arrows;
        positive("arrows.min_speed", arrows.min_speed.into())?;
        if arrows.max_speed < arrows.min_speed {
            return Err(TuningError::SpeedRange {
                min: arrows.min_speed,
                max: arrows.max_speed,
            });
        }
        positive("arrows.body_length", arrows.body_length.into())?;
        positive("arrows.tip_length", arrows.tip_length.into())?;
        positive("arrows.body_half_width", arrows.body_half_width.into())?;
        positive("arrows.tip_half_width", arrows.tip_half_width.into())?;
        positive("arrows.graze_cooldown_ms", arrows.graze_cooldown_ms)?;
        positive("arrows.graze_score", arrows.graze_score.into())?;
        let [near, mid, far] = arrows.proximity_thresholds;
        if !(near > 0.0 && near < mid && mid < far) {
            return Err(TuningError::ThresholdsOutOfOrder(arrows.proximity_thresholds));
        }

        let spawner = &self.spawner;
        positive("spawner.initial_interval_ms", spawner.initial_interval_ms)?;
        positive("spawner.min_interval_ms", spawner.min_interval_ms)?;
        positive("spawner.ramp_every", spawner.ramp_every.into())?;
        positive("spawner.max_attempts", spawner.max_attempts.into())?;
        non_negative("spawner.edge_margin", spawner.edge_margin.into())?;
        non_negative("spawner.aim_jitter", spawner.aim_jitter.into())?;
        non_negative("arrows.offscreen_pad", self.arrows.offscreen_pad.into())?;
        // Arrows spawn `edge_margin` outside the arena and must survive it
        if self.arrows.offscreen_pad < spawner.edge_margin {
            return Err(TuningError::PadInsideSpawnMargin {
                pad: self.arrows.offscreen_pad,
                margin: spawner.edge_margin,
            });
        }
        if spawner.min_interval_ms > spawner.initial_interval_ms {
            return Err(TuningError::SpawnFloorAboveInitial {
                floor: spawner.min_interval_ms,
                initial: spawner.initial_interval_ms,
            });
        }
        if !(spawner.ramp_factor > 0.0 && spawner.ramp_factor < 1.0) {
            return Err(TuningError::OutOfRange {
                name: "spawner.ramp_factor",
                range: "(0, 1)",
                value: spawner.ramp_factor,
            });
        }

        let skills = &self.skills;
        positive("skills.meter_max_a", skills.meter_max_a.into())?;
        positive("skills.meter_max_b", skills.meter_max_b.into())?;
        positive("skills.slow_duration_ms", skills.slow_duration_ms)?;
        positive("skills.shrink_duration_ms", skills.shrink_duration_ms)?;
        positive("skills.shield_duration_ms", skills.shield_duration_ms)?;
        positive("skills.slow_speed_boost", skills.slow_speed_boost.into())?;
        if !(skills.slow_factor > 0.0 && skills.slow_factor <= 1.0) {
            return Err(TuningError::OutOfRange {
                name: "skills.slow_factor",
                range: "(0, 1]",
                value: skills.slow_factor.into(),
            });
        }

        positive("round.win_score", self.round.win_score.into())?;
        positive("round.special_move_every", self.round.special_move_every.into())?;
        if self.round.game_over_delay_ms < 0.0 {
            return Err(TuningError::NonPositive {
                name: "round.game_over_delay_ms",
                value: self.round.game_over_delay_ms,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.round.win_score, 50);
        assert_eq!(tuning.skills.meter_max_a, 15);
        assert_eq!(tuning.skills.meter_max_b, 20);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let tuning = Tuning::from_json_str(r#"{ "round": { "win_score": 10 } }"#).unwrap();
        assert_eq!(tuning.round.win_score, 10);
        assert_eq!(tuning.arena, ArenaTuning::default());
        assert_eq!(tuning.round.special_move_every, SPECIAL_MOVE_EVERY);
    }

    #[test]
    fn test_rejects_zero_arena() {
        let mut tuning = Tuning::default();
        tuning.arena.width = 0.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NonPositive { name: "arena.width", .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_speed_range() {
        let mut tuning = Tuning::default();
        tuning.arrows.min_speed = 400.0;
        tuning.arrows.max_speed = 200.0;
        assert!(matches!(tuning.validate(), Err(TuningError::SpeedRange { .. })));
    }

    #[test]
    fn test_rejects_buffer_narrower_than_dead_zone() {
        let mut tuning = Tuning::default();
        tuning.arena.divider_buffer = 5.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::BufferNarrowerThanDeadZone { .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        let mut tuning = Tuning::default();
        tuning.skills.shield_duration_ms = 0.0;
        assert!(tuning.validate().is_err());

        let mut tuning = Tuning::default();
        tuning.skills.slow_duration_ms = -1.0;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_rejects_unordered_thresholds() {
        let mut tuning = Tuning::default();
        tuning.arrows.proximity_thresholds = [85.0, 55.0, 120.0];
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::ThresholdsOutOfOrder(_))
        ));
    }

    #[test]
    fn test_rejects_bad_ramp() {
        let mut tuning = Tuning::default();
        tuning.spawner.ramp_factor = 1.0;
        assert!(tuning.validate().is_err());

        let mut tuning = Tuning::default();
        tuning.spawner.ramp_every = 0;
        assert!(tuning.validate().is_err());

        let mut tuning = Tuning::default();
        tuning.spawner.min_interval_ms = 1000.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::SpawnFloorAboveInitial { .. })
        ));
    }

    #[test]
    fn test_rejects_negative_aim_jitter() {
        assert!(matches!(
            Tuning::from_json_str(r#"{ "spawner": { "aim_jitter": -5.0 } }"#),
            Err(TuningError::Negative { name: "spawner.aim_jitter", .. })
        ));
        // Zero jitter aims dead at the players and is fine
        assert!(Tuning::from_json_str(r#"{ "spawner": { "aim_jitter": 0.0 } }"#).is_ok());
    }

    #[test]
    fn test_rejects_negative_edge_margin() {
        let mut tuning = Tuning::default();
        tuning.spawner.edge_margin = -1.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Negative { name: "spawner.edge_margin", .. })
        ));
    }

    #[test]
    fn test_rejects_offscreen_pad_inside_spawn_margin() {
        assert!(matches!(
            Tuning::from_json_str(r#"{ "arrows": { "offscreen_pad": -50.0 } }"#),
            Err(TuningError::Negative { name: "arrows.offscreen_pad", .. })
        ));

        let mut tuning = Tuning::default();
        tuning.arrows.offscreen_pad = 10.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::PadInsideSpawnMargin { .. })
        ));
    }

    #[test]
    fn test_rejects_non_finite_spawn_geometry() {
        let mut tuning = Tuning::default();
        tuning.spawner.aim_jitter = f32::INFINITY;
        assert!(tuning.validate().is_err());

        let mut tuning = Tuning::default();
        tuning.arrows.offscreen_pad = f32::NAN;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        assert!(matches!(
            Tuning::from_json_str("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Tuning::load("/definitely/not/here.json"),
            Err(TuningError::Io(_))
        ));
    }
}
