//! Demo/idle mode: synthesizes intents so the game plays itself
//!
//! Deterministic and stateless: the intent only depends on the round state.
//! Each player is pushed away from nearby danger, weighted by closeness, and
//! drifts back toward its zone center when nothing threatens it. Skills fire
//! as soon as they are ready.

use glam::Vec2;

use super::arrow::Arrow;
use super::state::{Player, RoundState};
use super::tick::PlayerIntent;

/// Danger closer than this (pixels) steers the player
pub const DANGER_RADIUS: f32 = 150.0;
/// Closer than this to the zone center counts as home
const HOME_TOLERANCE: f32 = 4.0;

/// Closest point on an arrow that can hurt this player
fn danger_point(player: &Player, arrow: &Arrow) -> Vec2 {
    if player.ability.shield_active() || player.small_radius.is_none() {
        // Only the tip matters
        return arrow.tip_point();
    }
    let tail = arrow.tail_point();
    let tip = arrow.tip_point();
    let along = (player.pos - tail).dot(arrow.dir);
    tail + arrow.dir * along.clamp(0.0, (tip - tail).length())
}

/// Intent for one player
pub fn steer(player: &Player, arrows: &[Arrow]) -> PlayerIntent {
    if !player.alive {
        return PlayerIntent::default();
    }

    let mut push = Vec2::ZERO;
    for arrow in arrows.iter().filter(|a| !a.remove) {
        let away = player.pos - danger_point(player, arrow);
        let dist = away.length();
        if dist < DANGER_RADIUS {
            let weight = 1.0 - dist / DANGER_RADIUS;
            // Sidestep the flight line rather than running ahead of it
            let side = if arrow.dir.perp().dot(away) >= 0.0 {
                arrow.dir.perp()
            } else {
                -arrow.dir.perp()
            };
            push += (away.normalize_or_zero() + side) * weight;
        }
    }

    let movement = if push.length() > 0.05 {
        push
    } else {
        let home = player.zone.center() - player.pos;
        if home.length() > HOME_TOLERANCE { home } else { Vec2::ZERO }
    };

    PlayerIntent {
        movement,
        trigger_skill: player.meter.is_ready() && !player.ability.is_active(),
    }
}

/// Intents for both players, indexed by role
pub fn plan(state: &RoundState) -> [PlayerIntent; 2] {
    [
        steer(&state.players[0], &state.arrows),
        steer(&state.players[1], &state.arrows),
    ]
}
