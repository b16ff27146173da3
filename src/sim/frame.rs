//! Render snapshot
//!
//! Plain data copied out of the simulation once per tick. Renderers only
//! ever see this, never the live bodies.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::body::CircleBody;
use super::boundary::Boundary;
use crate::{Color, rainbow_color};

/// Outline color of the boundary circle
pub const BOUNDARY_COLOR: Color = [255, 255, 255];

/// A filled or outlined circle to draw
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleSprite {
    pub position: DVec2,
    pub radius: f64,
    pub color: Color,
}

/// Trail point for rainbow trail rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: DVec2,
    pub color: Color,
}

/// One body as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySprite {
    pub circle: CircleSprite,
    /// Oldest first
    pub trail: Vec<TrailPoint>,
}

impl BodySprite {
    pub fn from_body(body: &CircleBody) -> Self {
        let len = body.trail.len();
        Self {
            circle: CircleSprite {
                position: body.position,
                radius: body.radius,
                color: body.color,
            },
            trail: body
                .trail
                .iter()
                .enumerate()
                .map(|(i, &pos)| TrailPoint {
                    pos,
                    color: rainbow_color(i, len),
                })
                .collect(),
        }
    }
}

/// Everything drawn for one tick, in draw order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub tick: u64,
    pub boundary: CircleSprite,
    pub bodies: Vec<BodySprite>,
}

impl Frame {
    pub fn capture(tick: u64, boundary: &Boundary, bodies: &[CircleBody]) -> Self {
        Self {
            tick,
            boundary: CircleSprite {
                position: boundary.center,
                radius: boundary.radius,
                color: BOUNDARY_COLOR,
            },
            bodies: bodies.iter().map(BodySprite::from_body).collect(),
        }
    }
}
