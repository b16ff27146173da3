//! Collision detection and response against the boundary circle
//!
//! A body collides when its predicted edge reaches the boundary surface:
//! `d + r >= R`, where `d` is the distance from the boundary center.

use glam::DVec2;

use super::boundary::Boundary;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Outward surface normal at the contact (center toward body)
    pub normal: DVec2,
    /// Overlap past the surface (for position correction)
    pub penetration: f64,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: DVec2::ZERO,
            penetration: 0.0,
        }
    }

    /// Position pushed back along the normal so the body just touches
    pub fn corrected(&self, pos: DVec2) -> DVec2 {
        pos - self.normal * self.penetration
    }
}

/// Check a body at `pos` against the inside of the boundary
///
/// A body exactly at the center has no contact normal and is reported as a
/// miss; with `r < R` it cannot be touching the surface anyway.
pub fn body_boundary_collision(
    pos: DVec2,
    body_radius: f64,
    boundary: &Boundary,
) -> CollisionResult {
    let d = pos.distance(boundary.center);
    if d + body_radius < boundary.radius {
        return CollisionResult::miss();
    }
    let Some(normal) = boundary.outward_normal_at(pos) else {
        return CollisionResult::miss();
    };
    CollisionResult {
        hit: true,
        normal,
        penetration: d + body_radius - boundary.radius,
    }
}

/// Reflect velocity off a surface, scaling the reflected normal part
///
/// v' = v - 2(v·n)n·e. With e = 1 this is a mirror reflection; e < 1 loses
/// normal speed and e > 1 gains it.
#[inline]
pub fn reflect_velocity(velocity: DVec2, normal: DVec2, restitution: f64) -> DVec2 {
    velocity - 2.0 * velocity.dot(normal) * normal * restitution
}

/// Split a velocity into normal and tangential parts relative to `normal`
#[inline]
pub fn decompose(velocity: DVec2, normal: DVec2) -> (f64, DVec2) {
    let vn = velocity.dot(normal);
    (vn, velocity - normal * vn)
}
