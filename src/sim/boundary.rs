//! The containing circle
//!
//! Bodies live inside the boundary; its surface is the only thing they
//! collide with.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::config::BoundaryConfig;

/// Immutable containing circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub center: DVec2,
    pub radius: f64,
}

impl Boundary {
    pub fn new(center: DVec2, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Signed distance from a body's edge to the boundary surface
    ///
    /// Negative while the body is fully inside, zero when touching,
    /// positive when penetrating.
    #[inline]
    pub fn penetration(&self, pos: DVec2, body_radius: f64) -> f64 {
        pos.distance(self.center) + body_radius - self.radius
    }

    /// Whether a body at `pos` sits inside the surface (with slack `eps`)
    #[inline]
    pub fn contains(&self, pos: DVec2, body_radius: f64, eps: f64) -> bool {
        self.penetration(pos, body_radius) <= eps
    }

    /// Unit normal pointing from the center out through `pos`
    ///
    /// `None` at the exact center, where no direction is defined.
    #[inline]
    pub fn outward_normal_at(&self, pos: DVec2) -> Option<DVec2> {
        (pos - self.center).try_normalize()
    }
}

impl From<BoundaryConfig> for Boundary {
    fn from(config: BoundaryConfig) -> Self {
        Self::new(config.center, config.radius)
    }
}
