//! Fixed timestep simulation tick
//!
//! One call advances a round by `dt` seconds in a fixed order:
//!
//! 1. input: quit, debug toggles, skill triggers (autopilot may supply intents)
//! 2. effect timers expire, speed factor and radius follow them
//! 3. alive players move
//! 4. spawner
//! 5. arrows advance, scaled by the global slow factor
//! 6. slash effects age
//! 7. collisions, role A first; role B is skipped if role A died
//! 8. resolved and off-arena arrows are retired
//! 9. terminal check
//! 10. special move cue

use glam::Vec2;

use super::arrow::Arrow;
use super::autopilot;
use super::collision::{ResolveContext, resolve_player};
use super::state::{GameEvent, PlayerRole, RoundPhase, RoundState};

/// One player's intent for a tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerIntent {
    /// Movement direction; any length, zero for none
    pub movement: Vec2,
    /// Edge event: fire the skill this tick
    pub trigger_skill: bool,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Indexed by `PlayerRole::index`
    pub intents: [PlayerIntent; 2],
    /// Flip hitbox display
    pub toggle_hitboxes: bool,
    /// Stop the session; no further ticks do any work
    pub quit: bool,
    /// Idle/demo mode - the autopilot replaces `intents`
    pub autopilot: bool,
}

/// Advance the round by one fixed timestep
pub fn tick(state: &mut RoundState, input: &TickInput, dt: f32) {
    state.events.clear();

    if input.quit && !state.quit_requested {
        log::info!("Quit requested");
        state.quit_requested = true;
    }
    if state.quit_requested {
        return;
    }
    if input.toggle_hitboxes {
        state.show_hitboxes = !state.show_hitboxes;
    }

    // Nothing moves until the round is reset
    if state.phase.is_terminal() {
        return;
    }

    state.clock_ms += f64::from(dt) * 1000.0;
    state.time_ticks += 1;
    let now = state.clock_ms;

    // 1. Skill triggers
    let intents = if input.autopilot {
        autopilot::plan(state)
    } else {
        input.intents
    };
    for role in PlayerRole::ALL {
        let player = &mut state.players[role.index()];
        if !player.alive || !intents[role.index()].trigger_skill {
            continue;
        }
        if player
            .ability
            .trigger(&mut player.meter, now, &state.tuning.skills)
        {
            // Shrink applies (and re-clamps) right away
            player.sync_ability(&state.tuning);
            state.events.push(GameEvent::SkillTriggered { role });
            log::info!("Player {} triggered skill at {:.0} ms", role.as_str(), now);
        }
    }

    // 2. Effect timers
    let events = &mut state.events;
    for player in &mut state.players {
        let role = player.role;
        player.ability.expire(now, |kind| {
            events.push(GameEvent::EffectExpired { role, kind });
        });
        player.sync_ability(&state.tuning);
    }

    // 3. Movement
    for player in state.players.iter_mut().filter(|p| p.alive) {
        player.move_by(intents[player.role.index()].movement, dt);
    }

    // 4. Spawner
    let targets = [state.players[0].pos, state.players[1].pos];
    if let Some(plan) =
        state
            .spawner
            .maybe_spawn(now, targets, &state.arena, &state.tuning, &mut state.rng)
    {
        let id = state.next_entity_id();
        state
            .arrows
            .push(Arrow::new(id, plan.origin, plan.aim, plan.speed, state.geometry));
        state.events.push(GameEvent::ArrowSpawned { arrow_id: id });
    }

    // 5. Arrows
    let time_scale = state.arrow_time_scale();
    for arrow in &mut state.arrows {
        arrow.advance(time_scale, dt);
    }

    // 6. Slashes
    for slash in &mut state.slashes {
        slash.advance(dt);
    }
    state.slashes.retain(|s| s.alive());

    // 7. Collisions
    let ctx = ResolveContext {
        now_ms: now,
        arrows: &state.tuning.arrows,
        invincible_a: state.tuning.debug.invincible_a,
    };
    for role in PlayerRole::ALL {
        let player = &mut state.players[role.index()];
        if !player.alive {
            continue;
        }
        let outcome = resolve_player(
            player,
            &mut state.arrows,
            &ctx,
            &mut state.slashes,
            &mut state.events,
        );

        if outcome.gained > 0 {
            player.score += outcome.gained;
            if player.meter.add(outcome.gained) {
                state.events.push(GameEvent::SkillReady { role, at_ms: now });
                log::info!("Player {} skill ready", role.as_str());
            }
        }

        if let Some(arrow_id) = outcome.killed_by {
            player.alive = false;
            state.events.push(GameEvent::PlayerKilled { role, arrow_id });
            log::info!("Player {} hit by arrow {}", role.as_str(), arrow_id);
            // Role B never resolves against a tick role A died in
            break;
        }
    }

    // 8. Retirement
    let arena = &state.arena;
    let pad = state.tuning.arrows.offscreen_pad;
    state
        .arrows
        .retain(|a| !a.remove && !a.is_offscreen(arena, pad));

    // 9. Terminal check
    let phase = if !state.players[0].alive {
        RoundPhase::RoleADead
    } else if !state.players[1].alive {
        RoundPhase::RoleBDead
    } else if state.combined_score() >= state.tuning.round.win_score {
        RoundPhase::Won
    } else {
        RoundPhase::Running
    };
    if phase.is_terminal() {
        state.phase = phase;
        state.events.push(GameEvent::RoundEnded { phase });
        log::info!(
            "Round {} over: {:?} (A {}, B {}) after {:.1}s",
            state.round_index + 1,
            phase,
            state.players[0].score,
            state.players[1].score,
            now / 1000.0
        );
    }

    // 10. Special move cue
    let scores = [state.players[0].score, state.players[1].score];
    let started = state
        .cue
        .update(scores, state.tuning.round.special_move_every);
    for role in PlayerRole::ALL {
        if started[role.index()] {
            state.events.push(GameEvent::SpecialMove { role });
        }
    }
}
