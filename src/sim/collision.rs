//! Role-aware arrow vs player resolution
//!
//! The same arrow reads differently depending on who it touches:
//! - time dilation (role A) carries a weapon: touching the body is a graze
//!   that scores (once per arrow per cooldown) and destroys the arrow; only
//!   the tip kills.
//! - evasion (role B) is unarmed: touching any part kills unless the shield
//!   absorbs it, and every arrow scores once per proximity level its tip
//!   reaches.

use super::arrow::Arrow;
use super::skill::Ability;
use super::state::{GameEvent, Player, SlashEffect};
use crate::tuning::ArrowTuning;

/// Per-tick values the resolver needs
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub now_ms: f64,
    pub arrows: &'a ArrowTuning,
    /// Debug: lethal hits on role A are ignored
    pub invincible_a: bool,
}

/// What one player's pass produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionOutcome {
    /// Arrow that killed the player, if any
    pub killed_by: Option<u32>,
    pub gained: u32,
}

impl CollisionOutcome {
    #[inline]
    pub fn killed(&self) -> bool {
        self.killed_by.is_some()
    }
}

/// Resolve one player against every unresolved arrow
///
/// Arrows already flagged for removal this tick are skipped. Resolution stops
/// at the first fatal hit; points earned before it still count.
pub fn resolve_player(
    player: &mut Player,
    arrows: &mut [Arrow],
    ctx: &ResolveContext<'_>,
    slashes: &mut Vec<SlashEffect>,
    events: &mut Vec<GameEvent>,
) -> CollisionOutcome {
    match player.ability {
        Ability::TimeDilation { .. } => resolve_grazer(player, arrows, ctx, slashes, events),
        Ability::EvasionShield { .. } => resolve_evader(player, arrows, ctx, slashes, events),
    }
}

fn resolve_grazer(
    player: &Player,
    arrows: &mut [Arrow],
    ctx: &ResolveContext<'_>,
    slashes: &mut Vec<SlashEffect>,
    events: &mut Vec<GameEvent>,
) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();

    for arrow in arrows.iter_mut().filter(|a| !a.remove) {
        if arrow.overlaps_lethal(player.pos, player.radius) && !ctx.invincible_a {
            outcome.killed_by = Some(arrow.id);
            break;
        }

        if arrow.overlaps_graze(player.pos, player.radius)
            && arrow.graze_ready(ctx.now_ms, ctx.arrows.graze_cooldown_ms)
        {
            arrow.mark_scored(ctx.now_ms);
            arrow.remove = true;
            let gained = ctx.arrows.graze_score;
            outcome.gained += gained;
            slashes.push(SlashEffect::new(arrow.pos, arrow.id));
            events.push(GameEvent::Grazed {
                arrow_id: arrow.id,
                gained,
            });
            log::trace!("Graze on arrow {} (+{})", arrow.id, gained);
        }
    }

    outcome
}

fn resolve_evader(
    player: &mut Player,
    arrows: &mut [Arrow],
    ctx: &ResolveContext<'_>,
    slashes: &mut Vec<SlashEffect>,
    events: &mut Vec<GameEvent>,
) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();
    let thresholds = &ctx.arrows.proximity_thresholds;

    for arrow in arrows.iter_mut().filter(|a| !a.remove) {
        let touched = arrow.overlaps_lethal(player.pos, player.radius)
            || arrow.overlaps_graze(player.pos, player.radius);

        if touched {
            if player.ability.intercept() {
                arrow.remove = true;
                slashes.push(SlashEffect::new(arrow.pos, arrow.id));
                events.push(GameEvent::ShieldBlocked { arrow_id: arrow.id });
                log::debug!("Shield absorbed arrow {}", arrow.id);
                continue;
            }
            outcome.killed_by = Some(arrow.id);
            break;
        }

        let gained = arrow.ratchet_proximity(player.pos, thresholds);
        if gained > 0 {
            outcome.gained += gained;
            slashes.push(SlashEffect::new(player.pos, arrow.id));
            events.push(GameEvent::ProximityScored {
                arrow_id: arrow.id,
                level: arrow.proximity_level(),
                gained,
            });
            log::trace!(
                "Near miss on arrow {} (level {}, +{})",
                arrow.id,
                arrow.proximity_level(),
                gained
            );
        }
    }

    outcome
}
