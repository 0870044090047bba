//! Adaptive arrow spawner
//!
//! The spawn interval shrinks geometrically with the number of arrows
//! spawned, not with wall-clock time: every `ramp_every` spawns it becomes
//! `max(floor, interval * ramp_factor)`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use crate::tuning::{SpawnerTuning, Tuning};

/// Where and how a new arrow starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPlan {
    pub origin: Vec2,
    pub aim: Vec2,
    /// Pixels per second
    pub speed: f32,
}

/// Spawn scheduler state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    interval_ms: f64,
    spawned: u32,
    last_spawn_ms: f64,
}

impl Spawner {
    pub fn new(tuning: &SpawnerTuning) -> Self {
        Self {
            interval_ms: tuning.initial_interval_ms,
            spawned: 0,
            last_spawn_ms: 0.0,
        }
    }

    #[inline]
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    #[inline]
    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    /// Check if the next arrow is due at `now_ms`
    #[inline]
    pub fn is_due(&self, now_ms: f64) -> bool {
        now_ms - self.last_spawn_ms >= self.interval_ms
    }

    /// Count a spawn and apply the difficulty ramp
    pub fn record_spawn(&mut self, now_ms: f64, tuning: &SpawnerTuning) {
        self.last_spawn_ms = now_ms;
        self.spawned += 1;
        if self.spawned % tuning.ramp_every == 0 {
            let ramped = (self.interval_ms * tuning.ramp_factor).floor();
            self.interval_ms = ramped.max(tuning.min_interval_ms);
        }
    }

    /// Produce a spawn plan if one is due
    ///
    /// `targets` are the live positions of role A and role B.
    pub fn maybe_spawn<R: Rng>(
        &mut self,
        now_ms: f64,
        targets: [Vec2; 2],
        arena: &Arena,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Option<SpawnPlan> {
        if !self.is_due(now_ms) {
            return None;
        }
        self.record_spawn(now_ms, &tuning.spawner);

        let (origin, aim) = pick_site_and_aim(targets, arena, &tuning.spawner, rng);
        let speed = rng.random_range(tuning.arrows.min_speed..=tuning.arrows.max_speed);
        log::debug!(
            "Spawn #{} at ({:.0}, {:.0}), next interval {:.0} ms",
            self.spawned,
            origin.x,
            origin.y,
            self.interval_ms
        );
        Some(SpawnPlan { origin, aim, speed })
    }
}

/// Random point on one of the four edges, pushed outward by `margin`
fn pick_edge_point<R: Rng>(arena: &Arena, margin: f32, rng: &mut R) -> Vec2 {
    match rng.random_range(0..4) {
        0 => Vec2::new(rng.random_range(0.0..=arena.width), -margin),
        1 => Vec2::new(rng.random_range(0.0..=arena.width), arena.height + margin),
        2 => Vec2::new(-margin, rng.random_range(0.0..=arena.height)),
        _ => Vec2::new(arena.width + margin, rng.random_range(0.0..=arena.height)),
    }
}

/// One of the two players, 50/50, with a bounded uniform jitter
fn pick_aim<R: Rng>(targets: [Vec2; 2], jitter: f32, rng: &mut R) -> Vec2 {
    let target = if rng.random_bool(0.5) { targets[0] } else { targets[1] };
    target
        + Vec2::new(
            rng.random_range(-jitter..=jitter),
            rng.random_range(-jitter..=jitter),
        )
}

/// Choose a spawn site and aim point, keeping arrows away from the divider
///
/// A site inside the buffer band is pushed just outside it. If it still lands
/// in the dead zone the whole draw is repeated, at most `max_attempts` times;
/// after that the site is clamped to the left edge of the buffer band.
pub fn pick_site_and_aim<R: Rng>(
    targets: [Vec2; 2],
    arena: &Arena,
    tuning: &SpawnerTuning,
    rng: &mut R,
) -> (Vec2, Vec2) {
    let mut last = (Vec2::ZERO, Vec2::ZERO);
    for _ in 0..tuning.max_attempts {
        let mut origin = pick_edge_point(arena, tuning.edge_margin, rng);
        let aim = pick_aim(targets, tuning.aim_jitter, rng);
        origin.x = arena.push_out_of_buffer(origin.x);
        if !arena.in_dead_zone(origin.x) {
            return (origin, aim);
        }
        last = (origin, aim);
    }

    log::warn!("Spawn retries exhausted near the divider, clamping");
    let (mut origin, aim) = last;
    origin.x = arena.divider_x - arena.divider_buffer - 1.0;
    (origin, aim)
}
