//! SDF-based overlap tests
//!
//! Arrow hit regions are analytic shapes; a player circle overlaps a region
//! when the signed distance from the circle center to the shape is at most
//! the circle radius.

use glam::Vec2;

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Signed distance to a box centered at `center` whose long axis is `axis`
/// (unit length)
pub fn sd_oriented_box(p: Vec2, center: Vec2, axis: Vec2, half_length: f32, half_width: f32) -> f32 {
    let local = p - center;
    let q = Vec2::new(
        local.dot(axis).abs() - half_length,
        local.dot(axis.perp()).abs() - half_width,
    );
    q.max(Vec2::ZERO).length() + q.x.max(q.y).min(0.0)
}

/// Signed distance to a triangle (negative inside)
pub fn sd_triangle(p: Vec2, p0: Vec2, p1: Vec2, p2: Vec2) -> f32 {
    let e0 = p1 - p0;
    let e1 = p2 - p1;
    let e2 = p0 - p2;
    let v0 = p - p0;
    let v1 = p - p1;
    let v2 = p - p2;

    let pq0 = v0 - e0 * (v0.dot(e0) / e0.dot(e0)).clamp(0.0, 1.0);
    let pq1 = v1 - e1 * (v1.dot(e1) / e1.dot(e1)).clamp(0.0, 1.0);
    let pq2 = v2 - e2 * (v2.dot(e2) / e2.dot(e2)).clamp(0.0, 1.0);

    // Winding sign so the test works for either vertex order
    let s = (e0.x * e2.y - e0.y * e2.x).signum();
    let d = Vec2::new(pq0.dot(pq0), s * (v0.x * e0.y - v0.y * e0.x))
        .min(Vec2::new(pq1.dot(pq1), s * (v1.x * e1.y - v1.y * e1.x)))
        .min(Vec2::new(pq2.dot(pq2), s * (v2.x * e2.y - v2.y * e2.x)));

    -d.x.sqrt() * d.y.signum()
}

/// Check if a circle overlaps a shape given by its SDF
#[inline]
pub fn circle_overlaps<F>(center: Vec2, radius: f32, sdf: F) -> bool
where
    F: Fn(Vec2) -> f32,
{
    sdf(center) <= radius
}
