//! Round state and core simulation types
//!
//! `RoundState` is the single owner of everything that changes during a
//! round. Nothing here is global: two states built from the same tuning and
//! seed evolve identically under the same inputs.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::{Arena, Rect};
use super::arrow::{Arrow, ArrowGeometry};
use super::cue::SpecialMoveCue;
use super::skill::{Ability, EffectKind, EffectStatus, SkillMeter};
use super::spawner::Spawner;
use crate::tuning::{Tuning, TuningError};

/// The two combatants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerRole {
    /// Armed: grazes the shaft for points, only the tip kills
    A,
    /// Unarmed: any contact kills, near misses score
    B,
}

impl PlayerRole {
    pub const ALL: [PlayerRole; 2] = [PlayerRole::A, PlayerRole::B];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            PlayerRole::A => 0,
            PlayerRole::B => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlayerRole::A => "A",
            PlayerRole::B => "B",
        }
    }
}

/// A player-controlled circle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub role: PlayerRole,
    pub pos: Vec2,
    /// Current collision radius
    pub radius: f32,
    pub base_radius: f32,
    /// Only role B can shrink
    pub small_radius: Option<f32>,
    /// Pixels per second before the speed factor
    pub base_speed: f32,
    pub speed_factor: f32,
    pub alive: bool,
    pub zone: Rect,
    pub score: u32,
    pub meter: SkillMeter,
    pub ability: Ability,
}

impl Player {
    /// Create a player at the center of its zone
    pub fn new(role: PlayerRole, arena: &Arena, tuning: &Tuning) -> Self {
        let zone = arena.zone(role);
        let players = &tuning.players;
        let (base_radius, small_radius, base_speed, meter_max, ability) = match role {
            PlayerRole::A => (
                players.radius_a,
                None,
                players.speed_a,
                tuning.skills.meter_max_a,
                Ability::time_dilation(),
            ),
            PlayerRole::B => (
                players.radius_b,
                Some(players.radius_b_small),
                players.speed_b,
                tuning.skills.meter_max_b,
                Ability::evasion_shield(),
            ),
        };
        Self {
            role,
            pos: zone.clamp_circle(zone.center(), base_radius),
            radius: base_radius,
            base_radius,
            small_radius,
            base_speed,
            speed_factor: 1.0,
            alive: true,
            zone,
            score: 0,
            meter: SkillMeter::new(meter_max),
            ability,
        }
    }

    /// Switch between normal and reduced radius, re-clamping to the zone
    pub fn set_small(&mut self, small: bool) {
        let Some(small_radius) = self.small_radius else {
            return;
        };
        self.radius = if small { small_radius } else { self.base_radius };
        self.pos = self.zone.clamp_circle(self.pos, self.radius);
    }

    /// Move along an intent (normalized, zero for none)
    pub fn move_by(&mut self, intent: Vec2, dt: f32) {
        let dir = crate::intent_direction(intent);
        self.pos += dir * self.base_speed * self.speed_factor * dt;
        self.pos = self.zone.clamp_circle(self.pos, self.radius);
    }

    /// Sync radius and speed with the ability's open windows
    pub fn sync_ability(&mut self, tuning: &Tuning) {
        self.speed_factor = self.ability.speed_factor(&tuning.skills);
        let shrunk = self.ability.is_shrunk();
        self.set_small(shrunk);
    }
}

/// Short-lived slash mark (collaborator-facing only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlashEffect {
    pub pos: Vec2,
    /// 1.0 when spawned, gone at 0.0
    pub life: f32,
    pub size: f32,
    pub angle_deg: f32,
}

/// Slash lifetime in seconds (10 frames at 60 Hz)
pub const SLASH_LIFETIME: f32 = 10.0 / 60.0;
pub const SLASH_START_SIZE: f32 = 22.0;
/// Pixels per second
pub const SLASH_GROWTH: f32 = 120.0;

impl SlashEffect {
    /// Create a slash with a tilt derived from `salt`
    pub fn new(pos: Vec2, salt: u32) -> Self {
        let hash = salt.wrapping_mul(2654435761).wrapping_add(31337);
        let rand = (hash % 1000) as f32 / 1000.0;
        Self {
            pos,
            life: 1.0,
            size: SLASH_START_SIZE,
            angle_deg: -20.0 + rand * 40.0,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.life -= dt / SLASH_LIFETIME;
        self.size += SLASH_GROWTH * dt;
    }

    #[inline]
    pub fn alive(&self) -> bool {
        self.life > 0.0
    }
}

/// Round lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    Running,
    RoleADead,
    RoleBDead,
    /// Combined score reached the threshold
    Won,
}

impl RoundPhase {
    #[inline]
    pub fn is_terminal(self) -> bool {
        self != RoundPhase::Running
    }
}

/// Something that happened during a tick, for collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ArrowSpawned { arrow_id: u32 },
    Grazed { arrow_id: u32, gained: u32 },
    ProximityScored { arrow_id: u32, level: u8, gained: u32 },
    ShieldBlocked { arrow_id: u32 },
    PlayerKilled { role: PlayerRole, arrow_id: u32 },
    SkillReady { role: PlayerRole, at_ms: f64 },
    SkillTriggered { role: PlayerRole },
    EffectExpired { role: PlayerRole, kind: EffectKind },
    SpecialMove { role: PlayerRole },
    RoundEnded { phase: RoundPhase },
}

/// Complete state of one round plus the session values it was built from
#[derive(Debug, Clone)]
pub struct RoundState {
    /// Session seed
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub arena: Arena,
    pub geometry: ArrowGeometry,
    /// Rounds played before this one
    pub round_index: u32,
    /// Round clock in milliseconds
    pub clock_ms: f64,
    pub time_ticks: u64,
    pub phase: RoundPhase,
    /// Indexed by `PlayerRole::index`
    pub players: [Player; 2],
    pub arrows: Vec<Arrow>,
    pub slashes: Vec<SlashEffect>,
    pub spawner: Spawner,
    pub cue: SpecialMoveCue,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    pub show_hitboxes: bool,
    pub(crate) quit_requested: bool,
    next_id: u32,
}

impl RoundState {
    /// Build a fresh round; rejects invalid tuning
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        let arena = Arena::new(&tuning.arena);
        let players = [
            Player::new(PlayerRole::A, &arena, &tuning),
            Player::new(PlayerRole::B, &arena, &tuning),
        ];
        let state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            geometry: ArrowGeometry::new(&tuning.arrows),
            arena,
            round_index: 0,
            clock_ms: 0.0,
            time_ticks: 0,
            phase: RoundPhase::Running,
            players,
            arrows: Vec::new(),
            slashes: Vec::new(),
            spawner: Spawner::new(&tuning.spawner),
            cue: SpecialMoveCue::default(),
            events: Vec::new(),
            show_hitboxes: tuning.debug.show_hitboxes,
            quit_requested: false,
            next_id: 1,
            tuning,
        };
        log::info!("Round 1 starting (seed {})", seed);
        Ok(state)
    }

    /// Start the next round: everything per-round starts over, including the
    /// spawn difficulty ramp. The RNG stream carries on.
    pub fn reset(&mut self) {
        self.round_index += 1;
        self.clock_ms = 0.0;
        self.time_ticks = 0;
        self.phase = RoundPhase::Running;
        self.players = [
            Player::new(PlayerRole::A, &self.arena, &self.tuning),
            Player::new(PlayerRole::B, &self.arena, &self.tuning),
        ];
        self.arrows.clear();
        self.slashes.clear();
        self.spawner = Spawner::new(&self.tuning.spawner);
        self.cue = SpecialMoveCue::default();
        self.events.clear();
        log::info!("Round {} starting", self.round_index + 1);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn player(&self, role: PlayerRole) -> &Player {
        &self.players[role.index()]
    }

    #[inline]
    pub fn player_mut(&mut self, role: PlayerRole) -> &mut Player {
        &mut self.players[role.index()]
    }

    pub fn score(&self, role: PlayerRole) -> u32 {
        self.player(role).score
    }

    pub fn combined_score(&self) -> u32 {
        self.players.iter().map(|p| p.score).sum()
    }

    /// Velocity multiplier for every arrow this tick
    pub fn arrow_time_scale(&self) -> f32 {
        self.players
            .iter()
            .map(|p| p.ability.arrow_time_scale(&self.tuning.skills))
            .product()
    }

    #[inline]
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            round_index: self.round_index,
            clock_ms: self.clock_ms,
            phase: self.phase,
            players: self
                .players
                .iter()
                .map(|p| PlayerView {
                    role: p.role,
                    pos: p.pos,
                    radius: p.radius,
                    alive: p.alive,
                    score: p.score,
                    meter_ratio: p.meter.ratio(),
                    skill_ready: p.meter.is_ready(),
                    effects: p.ability.statuses(self.clock_ms),
                })
                .collect(),
            arrows: self
                .arrows
                .iter()
                .map(|a| ArrowView {
                    id: a.id,
                    pos: a.pos,
                    angle_deg: a.angle_degrees(),
                    proximity_level: a.proximity_level(),
                })
                .collect(),
            slashes: self.slashes.clone(),
            attack_frames: self.cue.fighter_frames(),
            boss_frame: self.cue.boss_frame(),
            combined_score: self.combined_score(),
            win_score: self.tuning.round.win_score,
            show_hitboxes: self.show_hitboxes,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub role: PlayerRole,
    pub pos: Vec2,
    pub radius: f32,
    pub alive: bool,
    pub score: u32,
    pub meter_ratio: f32,
    pub skill_ready: bool,
    pub effects: Vec<EffectStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArrowView {
    pub id: u32,
    pub pos: Vec2,
    pub angle_deg: f32,
    pub proximity_level: u8,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct RoundSnapshot {
    pub round_index: u32,
    pub clock_ms: f64,
    pub phase: RoundPhase,
    pub players: Vec<PlayerView>,
    pub arrows: Vec<ArrowView>,
    pub slashes: Vec<SlashEffect>,
    /// Attack animation frame per role, `None` while idle
    pub attack_frames: [Option<u8>; 2],
    pub boss_frame: u8,
    pub combined_score: u32,
    pub win_score: u32,
    pub show_hitboxes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_round() {
        let state = RoundState::new(Tuning::default(), 7).unwrap();
        assert_eq!(state.phase, RoundPhase::Running);
        assert_eq!(state.player(PlayerRole::A).pos, Vec2::new(300.0, 140.0));
        assert_eq!(state.player(PlayerRole::B).pos, Vec2::new(900.0, 140.0));
        assert!(state.players.iter().all(|p| p.alive && p.score == 0));
        assert_eq!(state.arrow_time_scale(), 1.0);
    }

    #[test]
    fn test_new_round_rejects_invalid_tuning() {
        let mut tuning = Tuning::default();
        tuning.arena.height = -5.0;
        assert!(RoundState::new(tuning, 1).is_err());
    }

    #[test]
    fn test_only_role_b_shrinks() {
        let state = RoundState::new(Tuning::default(), 1).unwrap();
        let mut a = state.player(PlayerRole::A).clone();
        a.set_small(true);
        assert_eq!(a.radius, 16.0);

        let mut b = state.player(PlayerRole::B).clone();
        b.set_small(true);
        assert_eq!(b.radius, 9.0);
        b.set_small(false);
        assert_eq!(b.radius, 16.0);
    }

    #[test]
    fn test_grow_reclamps_against_wall() {
        let state = RoundState::new(Tuning::default(), 1).unwrap();
        let mut b = state.player(PlayerRole::B).clone();
        b.set_small(true);
        // Pressed into the bottom-right corner while small
        b.move_by(Vec2::new(1.0, 1.0), 10.0);
        assert_eq!(b.pos, Vec2::new(1200.0 - 9.0, 280.0 - 9.0));
        b.set_small(false);
        assert_eq!(b.pos, Vec2::new(1200.0 - 16.0, 280.0 - 16.0));
        assert!(b.zone.contains_circle(b.pos, b.radius));
    }

    #[test]
    fn test_move_uses_speed_factor() {
        let state = RoundState::new(Tuning::default(), 1).unwrap();
        let mut a = state.player(PlayerRole::A).clone();
        a.speed_factor = 1.5;
        a.move_by(Vec2::new(0.0, -3.0), 0.1);
        assert!((a.pos.y - (140.0 - 45.0)).abs() < 1e-3);
        assert_eq!(a.pos.x, 300.0);
    }

    #[test]
    fn test_slash_fades() {
        let mut slash = SlashEffect::new(Vec2::ZERO, 3);
        assert!(slash.angle_deg >= -20.0 && slash.angle_deg <= 20.0);
        for _ in 0..9 {
            slash.advance(1.0 / 60.0);
        }
        assert!(slash.alive());
        slash.advance(1.0 / 60.0 + 1e-4);
        assert!(!slash.alive());
        assert!(slash.size > SLASH_START_SIZE);
    }

    #[test]
    fn test_entity_ids_increase() {
        let mut state = RoundState::new(Tuning::default(), 1).unwrap();
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = RoundState::new(Tuning::default(), 1).unwrap();
        let snapshot = state.snapshot();
        assert_eq!(snapshot.players.len(), 2);
        assert_eq!(snapshot.players[1].effects.len(), 2);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"phase\":\"Running\""));
    }
}
