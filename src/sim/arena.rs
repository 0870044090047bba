//! Arena geometry: play bounds, the vertical divider and per-zone bounds
//!
//! The arena spans `[0, width] x [0, height]`. Role A owns the left half,
//! role B the right half. Around the divider there are two bands:
//! - the buffer band (`|x - divider| <= buffer`): arrows never spawn here
//! - the dead zone (`|x - divider| <= dead_zone`): a spawn landing here is rerolled

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::PlayerRole;
use crate::tuning::ArenaTuning;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Check if a point lies inside (edges included)
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Clamp a circle center so the whole circle stays inside
    ///
    /// If the rect is narrower than the circle the center collapses onto the
    /// rect's midline instead of inverting the range.
    pub fn clamp_circle(&self, center: Vec2, radius: f32) -> Vec2 {
        let lo = self.min + Vec2::splat(radius);
        let hi = self.max - Vec2::splat(radius);
        let mid = self.center();
        Vec2::new(
            if lo.x <= hi.x { center.x.clamp(lo.x, hi.x) } else { mid.x },
            if lo.y <= hi.y { center.y.clamp(lo.y, hi.y) } else { mid.y },
        )
    }

    /// Check if a circle lies fully inside
    pub fn contains_circle(&self, center: Vec2, radius: f32) -> bool {
        self.clamp_circle(center, radius) == center
    }
}

/// The play field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub divider_x: f32,
    pub divider_buffer: f32,
    pub dead_zone: f32,
}

impl Arena {
    pub fn new(tuning: &ArenaTuning) -> Self {
        Self {
            width: tuning.width,
            height: tuning.height,
            divider_x: tuning.width / 2.0,
            divider_buffer: tuning.divider_buffer,
            dead_zone: tuning.dead_zone,
        }
    }

    /// Full arena bounds
    pub fn bounds(&self) -> Rect {
        Rect::new(Vec2::ZERO, Vec2::new(self.width, self.height))
    }

    /// Bounds of the zone a role is confined to
    pub fn zone(&self, role: PlayerRole) -> Rect {
        match role {
            PlayerRole::A => Rect::new(Vec2::ZERO, Vec2::new(self.divider_x, self.height)),
            PlayerRole::B => Rect::new(
                Vec2::new(self.divider_x, 0.0),
                Vec2::new(self.width, self.height),
            ),
        }
    }

    /// Check if an x coordinate falls in the divider's no-spawn band
    #[inline]
    pub fn in_buffer(&self, x: f32) -> bool {
        (x - self.divider_x).abs() <= self.divider_buffer
    }

    /// Check if an x coordinate falls in the inner dead zone
    #[inline]
    pub fn in_dead_zone(&self, x: f32) -> bool {
        (x - self.divider_x).abs() <= self.dead_zone
    }

    /// Push an x coordinate inside the buffer band to the nearest permitted
    /// coordinate just outside it
    pub fn push_out_of_buffer(&self, x: f32) -> f32 {
        if !self.in_buffer(x) {
            return x;
        }
        if x < self.divider_x {
            self.divider_x - self.divider_buffer - 1.0
        } else {
            self.divider_x + self.divider_buffer + 1.0
        }
    }

    /// Check if a point is further than `pad` outside the arena
    pub fn is_far_outside(&self, p: Vec2, pad: f32) -> bool {
        p.x < -pad || p.x > self.width + pad || p.y < -pad || p.y > self.height + pad
    }
}
