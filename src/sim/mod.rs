//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (arrows by spawn order, role A before role B)
//! - No rendering, input or file dependencies

pub mod arena;
pub mod arrow;
pub mod autopilot;
pub mod collision;
pub mod cue;
pub mod shape;
pub mod skill;
pub mod spawner;
pub mod state;
pub mod tick;

pub use arena::{Arena, Rect};
pub use arrow::{Arrow, ArrowGeometry, MAX_PROXIMITY_LEVEL, proximity_level};
pub use collision::{CollisionOutcome, ResolveContext, resolve_player};
pub use cue::SpecialMoveCue;
pub use shape::{circle_overlaps, sd_circle, sd_oriented_box, sd_triangle};
pub use skill::{Ability, EffectKind, EffectStatus, EffectTimer, SkillMeter};
pub use spawner::{SpawnPlan, Spawner, pick_site_and_aim};
pub use state::{
    ArrowView, GameEvent, Player, PlayerRole, PlayerView, RoundPhase, RoundSnapshot, RoundState,
    SlashEffect,
};
pub use tick::{PlayerIntent, TickInput, tick};
