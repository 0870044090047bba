//! Arrow projectiles and their two hit regions
//!
//! Laid out along the flight direction, from back to front:
//!
//! ```text
//!   tail ============ base |> tip
//!        graze region       lethal region
//! ```
//!
//! The tip point sits `head_offset` ahead of the arrow position. The lethal
//! region is the triangle between the tip point and the base; the graze region
//! is the box behind it. The two regions only share the base line.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::shape::{circle_overlaps, sd_oriented_box, sd_triangle};
use crate::heading_degrees;
use crate::tuning::ArrowTuning;

/// Fixed arrow dimensions, shared by every arrow of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowGeometry {
    pub body_length: f32,
    pub tip_length: f32,
    pub body_half_width: f32,
    pub tip_half_width: f32,
    /// Distance from the arrow position to its tip point
    pub head_offset: f32,
}

impl ArrowGeometry {
    pub fn new(tuning: &ArrowTuning) -> Self {
        Self {
            body_length: tuning.body_length,
            tip_length: tuning.tip_length,
            body_half_width: tuning.body_half_width,
            tip_half_width: tuning.tip_half_width,
            head_offset: tuning.body_length * tuning.head_body_ratio
                + tuning.tip_length * tuning.head_tip_ratio,
        }
    }
}

/// Highest proximity level an arrow can reach
pub const MAX_PROXIMITY_LEVEL: u8 = 3;

/// Proximity level for a tip-to-center distance
///
/// `thresholds` runs near to far: within `[0]` is level 3, within `[1]` is
/// level 2, within `[2]` is level 1, anything further is level 0.
pub fn proximity_level(distance: f32, thresholds: &[f32; 3]) -> u8 {
    if distance <= thresholds[0] {
        3
    } else if distance <= thresholds[1] {
        2
    } else if distance <= thresholds[2] {
        1
    } else {
        0
    }
}

/// An arrow entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arrow {
    pub id: u32,
    pub pos: Vec2,
    /// Unit flight direction
    pub dir: Vec2,
    /// Pixels per second, drawn once at creation
    pub speed: f32,
    pub vel: Vec2,
    pub geometry: ArrowGeometry,
    /// Ratchet: only ever increases, bounded by `MAX_PROXIMITY_LEVEL`
    proximity_level: u8,
    /// Clock time of the last scoring graze on this arrow
    last_scored_ms: Option<f64>,
    /// Resolved this tick; retired at the end of it
    pub remove: bool,
}

impl Arrow {
    /// Create an arrow at `origin` flying toward `aim`
    pub fn new(id: u32, origin: Vec2, aim: Vec2, speed: f32, geometry: ArrowGeometry) -> Self {
        let dir = (aim - origin).try_normalize().unwrap_or(Vec2::X);
        Self {
            id,
            pos: origin,
            dir,
            speed,
            vel: dir * speed,
            geometry,
            proximity_level: 0,
            last_scored_ms: None,
            remove: false,
        }
    }

    /// Move by velocity scaled by the global time factor
    #[inline]
    pub fn advance(&mut self, time_scale: f32, dt: f32) {
        self.pos += self.vel * time_scale * dt;
    }

    /// Front-most point of the lethal region
    #[inline]
    pub fn tip_point(&self) -> Vec2 {
        self.pos + self.dir * self.geometry.head_offset
    }

    /// Center of the line where the body meets the tip
    #[inline]
    pub fn base_point(&self) -> Vec2 {
        self.tip_point() - self.dir * self.geometry.tip_length
    }

    /// Back end of the body
    #[inline]
    pub fn tail_point(&self) -> Vec2 {
        self.base_point() - self.dir * self.geometry.body_length
    }

    /// Signed distance to the lethal (tip) region
    pub fn sd_lethal(&self, p: Vec2) -> f32 {
        let base = self.base_point();
        let side = self.dir.perp() * self.geometry.tip_half_width;
        sd_triangle(p, base + side, base - side, self.tip_point())
    }

    /// Signed distance to the graze (body) region
    pub fn sd_graze(&self, p: Vec2) -> f32 {
        let center = self.base_point() - self.dir * (self.geometry.body_length / 2.0);
        sd_oriented_box(
            p,
            center,
            self.dir,
            self.geometry.body_length / 2.0,
            self.geometry.body_half_width,
        )
    }

    pub fn overlaps_lethal(&self, center: Vec2, radius: f32) -> bool {
        circle_overlaps(center, radius, |p| self.sd_lethal(p))
    }

    pub fn overlaps_graze(&self, center: Vec2, radius: f32) -> bool {
        circle_overlaps(center, radius, |p| self.sd_graze(p))
    }

    #[inline]
    pub fn proximity_level(&self) -> u8 {
        self.proximity_level
    }

    /// Raise the proximity level for a player at `center`
    ///
    /// Returns the points earned: the level delta on a first-time rise, zero
    /// otherwise.
    pub fn ratchet_proximity(&mut self, center: Vec2, thresholds: &[f32; 3]) -> u32 {
        let level = proximity_level(self.tip_point().distance(center), thresholds);
        if level > self.proximity_level {
            let gained = u32::from(level - self.proximity_level);
            self.proximity_level = level;
            gained
        } else {
            0
        }
    }

    /// Check if this arrow may award a graze at `now_ms`
    pub fn graze_ready(&self, now_ms: f64, cooldown_ms: f64) -> bool {
        self.last_scored_ms
            .is_none_or(|last| now_ms - last >= cooldown_ms)
    }

    pub fn mark_scored(&mut self, now_ms: f64) {
        self.last_scored_ms = Some(now_ms);
    }

    /// Check if the arrow has left the arena by more than `pad`
    pub fn is_offscreen(&self, arena: &Arena, pad: f32) -> bool {
        arena.is_far_outside(self.pos, pad)
    }

    /// Heading in degrees, for sprite rotation
    pub fn angle_degrees(&self) -> f32 {
        heading_degrees(self.dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{ArenaTuning, ArrowTuning};

    fn arrow_east() -> Arrow {
        let geometry = ArrowGeometry::new(&ArrowTuning::default());
        Arrow::new(1, Vec2::ZERO, Vec2::new(100.0, 0.0), 200.0, geometry)
    }

    #[test]
    fn test_new_arrow_direction_and_velocity() {
        let arrow = arrow_east();
        assert_eq!(arrow.dir, Vec2::X);
        assert_eq!(arrow.vel, Vec2::new(200.0, 0.0));
        assert_eq!(arrow.proximity_level(), 0);
        // 150 * 0.55 + 26 * 0.6
        assert!((arrow.geometry.head_offset - 98.1).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_aim_falls_back() {
        let geometry = ArrowGeometry::new(&ArrowTuning::default());
        let arrow = Arrow::new(1, Vec2::ONE, Vec2::ONE, 200.0, geometry);
        assert_eq!(arrow.dir, Vec2::X);
    }

    #[test]
    fn test_advance_scales_with_time_factor() {
        let mut arrow = arrow_east();
        arrow.advance(1.0, 0.5);
        assert_eq!(arrow.pos, Vec2::new(100.0, 0.0));
        arrow.advance(0.25, 1.0);
        assert_eq!(arrow.pos, Vec2::new(150.0, 0.0));
    }

    #[test]
    fn test_regions_are_disjoint_along_axis() {
        let arrow = arrow_east();
        let tip = arrow.tip_point().x;
        let base = arrow.base_point().x;
        let tail = arrow.tail_point().x;
        assert!((tip - base - 26.0).abs() < 1e-3);
        assert!((base - tail - 150.0).abs() < 1e-3);

        // Point inside the tip, clear of the body
        let in_tip = Vec2::new(base + 10.0, 0.0);
        assert!(arrow.sd_lethal(in_tip) < 0.0);
        assert!(arrow.sd_graze(in_tip) > 0.0);

        // Point on the shaft, clear of the tip
        let on_shaft = Vec2::new(base - 40.0, 0.0);
        assert!(arrow.sd_graze(on_shaft) < 0.0);
        assert!(arrow.sd_lethal(on_shaft) > 0.0);
    }

    #[test]
    fn test_circle_overlap_from_the_side() {
        let arrow = arrow_east();
        let beside_shaft = Vec2::new(0.0, 4.0 + 16.0);
        assert!(arrow.overlaps_graze(beside_shaft, 16.0));
        assert!(!arrow.overlaps_graze(beside_shaft + Vec2::Y, 16.0));
        assert!(!arrow.overlaps_lethal(beside_shaft, 16.0));

        // Circle just in front of the tip point
        let ahead = arrow.tip_point() + Vec2::new(15.0, 0.0);
        assert!(arrow.overlaps_lethal(ahead, 16.0));
        assert!(!arrow.overlaps_graze(ahead, 16.0));
    }

    #[test]
    fn test_proximity_levels() {
        let t = [55.0, 85.0, 120.0];
        assert_eq!(proximity_level(10.0, &t), 3);
        assert_eq!(proximity_level(55.0, &t), 3);
        assert_eq!(proximity_level(60.0, &t), 2);
        assert_eq!(proximity_level(100.0, &t), 1);
        assert_eq!(proximity_level(121.0, &t), 0);
    }

    #[test]
    fn test_proximity_ratchet_awards_delta_once() {
        let t = [55.0, 85.0, 120.0];
        let mut arrow = arrow_east();
        let tip = arrow.tip_point();

        assert_eq!(arrow.ratchet_proximity(tip + Vec2::new(0.0, 100.0), &t), 1);
        assert_eq!(arrow.ratchet_proximity(tip + Vec2::new(0.0, 100.0), &t), 0);
        // Jump from 1 straight to 3
        assert_eq!(arrow.ratchet_proximity(tip + Vec2::new(0.0, 30.0), &t), 2);
        assert_eq!(arrow.proximity_level(), 3);
        // Moving away never lowers the level
        assert_eq!(arrow.ratchet_proximity(tip + Vec2::new(0.0, 500.0), &t), 0);
        assert_eq!(arrow.proximity_level(), 3);
    }

    #[test]
    fn test_graze_cooldown() {
        let mut arrow = arrow_east();
        assert!(arrow.graze_ready(0.0, 450.0));
        arrow.mark_scored(1000.0);
        assert!(!arrow.graze_ready(1200.0, 450.0));
        assert!(!arrow.graze_ready(1449.0, 450.0));
        assert!(arrow.graze_ready(1450.0, 450.0));
    }

    #[test]
    fn test_offscreen() {
        let arena = Arena::new(&ArenaTuning::default());
        let mut arrow = arrow_east();
        arrow.pos = Vec2::new(-20.0, 100.0);
        assert!(!arrow.is_offscreen(&arena, 120.0));
        arrow.pos = Vec2::new(1321.0, 100.0);
        assert!(arrow.is_offscreen(&arena, 120.0));
    }

    proptest::proptest! {
        #[test]
        fn prop_ratchet_pays_exact_deltas(
            distances in proptest::collection::vec(0.0f32..300.0, 1..60),
        ) {
            let t = [55.0, 85.0, 120.0];
            let mut arrow = arrow_east();
            let tip = arrow.tip_point();
            let mut paid = 0;
            let mut previous = 0;
            for d in distances {
                let gained = arrow.ratchet_proximity(tip + Vec2::new(0.0, d), &t);
                let level = arrow.proximity_level();
                proptest::prop_assert!(level >= previous);
                proptest::prop_assert!(level <= MAX_PROXIMITY_LEVEL);
                proptest::prop_assert_eq!(gained, u32::from(level - previous));
                paid += gained;
                previous = level;
            }
            proptest::prop_assert_eq!(paid, u32::from(arrow.proximity_level()));
        }
    }
}
