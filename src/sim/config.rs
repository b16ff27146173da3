//! Simulation configuration
//!
//! Everything here is fixed at construction. `validate` is the single gate
//! that rejects bad parameters before a run starts.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::{Color, velocity_from_polar};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("boundary radius must be positive and finite, got {0}")]
    BoundaryRadius(f64),
    #[error("body {index} radius must be positive and finite, got {radius}")]
    BodyRadius { index: usize, radius: f64 },
    #[error("body {index} (radius {radius}) does not fit inside boundary radius {boundary}")]
    BodyTooLarge {
        index: usize,
        radius: f64,
        boundary: f64,
    },
    #[error("body {index} starts outside the boundary")]
    BodyOutside { index: usize },
    #[error("body {index} has a non-finite position or velocity")]
    BodyNotFinite { index: usize },
    #[error("simulation needs at least one body")]
    NoBodies,
    #[error("gravity must be finite and non-negative, got {0}")]
    Gravity(f64),
    #[error("restitution must be finite and non-negative, got {0}")]
    Restitution(f64),
    #[error("invalid friction model: {0}")]
    Friction(String),
    #[error("{name} must be finite and non-negative, got {value}")]
    Threshold { name: &'static str, value: f64 },
    #[error("first note must be below 128, got {0}")]
    FirstNote(u8),
    #[error("invalid perturbation: {0}")]
    Perturbation(String),
}

/// How velocity is bled off, in flight and in contact with the boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum FrictionModel {
    /// Multiply velocity by `factor` every free-flight tick
    ConstantDamping { factor: f64 },
    /// Tangential friction bounded by the normal impulse on contact;
    /// velocity is zeroed when it drops below `static_threshold`
    Coulomb {
        coefficient: f64,
        static_threshold: f64,
    },
    /// Body enters a sliding state when post-bounce speed drops below
    /// `slide_threshold`; sliding contacts damp instead of reflecting
    Sliding {
        coefficient: f64,
        slide_threshold: f64,
    },
}

impl FrictionModel {
    /// Velocity multiplier for a free-flight tick
    pub fn flight_damping(&self) -> f64 {
        match self {
            FrictionModel::ConstantDamping { factor } => *factor,
            _ => 1.0,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        let threshold = |v: f64| v.is_finite() && v >= 0.0;
        match *self {
            FrictionModel::ConstantDamping { factor } => {
                if !(factor.is_finite() && factor > 0.0 && factor <= 1.0) {
                    return Err(ConfigError::Friction(format!(
                        "damping factor must be in (0, 1], got {factor}"
                    )));
                }
            }
            FrictionModel::Coulomb {
                coefficient,
                static_threshold,
            } => {
                if !unit(coefficient) {
                    return Err(ConfigError::Friction(format!(
                        "coulomb coefficient must be in [0, 1], got {coefficient}"
                    )));
                }
                if !threshold(static_threshold) {
                    return Err(ConfigError::Friction(format!(
                        "static threshold must be non-negative, got {static_threshold}"
                    )));
                }
            }
            FrictionModel::Sliding {
                coefficient,
                slide_threshold,
            } => {
                if !unit(coefficient) {
                    return Err(ConfigError::Friction(format!(
                        "sliding coefficient must be in [0, 1], got {coefficient}"
                    )));
                }
                if !threshold(slide_threshold) {
                    return Err(ConfigError::Friction(format!(
                        "slide threshold must be non-negative, got {slide_threshold}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Rule deciding whether a contact is loud enough to play a note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BounceSignificance {
    /// Largest absolute velocity component before the bounce
    ComponentThreshold,
    /// Normal impact speed
    #[default]
    ImpactSpeed,
    /// Change in speed across the bounce
    SpeedDelta,
}

/// Random velocity kicks ("environmental noise")
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Perturbation {
    /// Chance per body per tick of receiving a kick
    pub probability: f64,
    /// Upper bound on kick magnitude
    pub max_impulse: f64,
}

/// Initial velocity of a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Launch {
    Velocity(DVec2),
    Polar { speed: f64, angle_degrees: f64 },
}

impl Launch {
    pub fn velocity(&self) -> DVec2 {
        match *self {
            Launch::Velocity(v) => v,
            Launch::Polar {
                speed,
                angle_degrees,
            } => velocity_from_polar(speed, angle_degrees),
        }
    }
}

impl Default for Launch {
    fn default() -> Self {
        Launch::Velocity(DVec2::ZERO)
    }
}

/// The containing circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConfig {
    pub center: DVec2,
    pub radius: f64,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            center: DVec2::new(WIDTH / 2.0, HEIGHT / 2.0),
            radius: BOUNDARY_RADIUS,
        }
    }
}

/// Spawn description for one body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    pub position: DVec2,
    pub radius: f64,
    pub color: Color,
    #[serde(default)]
    pub launch: Launch,
}

impl Default for BodyConfig {
    /// Resting just inside the top of the default boundary
    fn default() -> Self {
        Self {
            position: DVec2::new(WIDTH / 2.0, HEIGHT / 2.0 - BOUNDARY_RADIUS + BODY_RADIUS),
            radius: BODY_RADIUS,
            color: [255, 0, 0],
            launch: Launch::default(),
        }
    }
}

/// Complete, immutable description of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub boundary: BoundaryConfig,
    pub bodies: Vec<BodyConfig>,
    /// Velocity added along +y (screen down) every tick
    pub gravity: f64,
    /// Bounce factor; above 1.0 adds energy on every bounce
    pub restitution: f64,
    pub friction: FrictionModel,
    #[serde(default)]
    pub significance: BounceSignificance,
    pub bounce_sound_threshold: f64,
    /// Minimum seconds between notes from the same body
    #[serde(default)]
    pub sound_cooldown: Option<f64>,
    #[serde(default = "default_first_note")]
    pub first_note: u8,
    #[serde(default)]
    pub perturbation: Option<Perturbation>,
    #[serde(default)]
    pub seed: u64,
}

fn default_first_note() -> u8 {
    DEFAULT_FIRST_NOTE
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            boundary: BoundaryConfig::default(),
            bodies: vec![BodyConfig::default()],
            gravity: GRAVITY,
            restitution: BOUNCE_FACTOR,
            friction: FrictionModel::ConstantDamping { factor: FRICTION },
            significance: BounceSignificance::ImpactSpeed,
            bounce_sound_threshold: 1.0,
            sound_cooldown: None,
            first_note: DEFAULT_FIRST_NOTE,
            perturbation: None,
            seed: 0,
        }
    }
}

impl SimulationConfig {
    /// Check every parameter; a config that passes can run indefinitely
    pub fn validate(&self) -> Result<(), ConfigError> {
        let boundary = self.boundary.radius;
        if !(boundary.is_finite() && boundary > 0.0) {
            return Err(ConfigError::BoundaryRadius(boundary));
        }
        if !self.boundary.center.is_finite() {
            return Err(ConfigError::BoundaryRadius(boundary));
        }
        if self.bodies.is_empty() {
            return Err(ConfigError::NoBodies);
        }
        for (index, body) in self.bodies.iter().enumerate() {
            let radius = body.radius;
            if !(radius.is_finite() && radius > 0.0) {
                return Err(ConfigError::BodyRadius { index, radius });
            }
            if radius >= boundary {
                return Err(ConfigError::BodyTooLarge {
                    index,
                    radius,
                    boundary,
                });
            }
            if !body.position.is_finite() || !body.launch.velocity().is_finite() {
                return Err(ConfigError::BodyNotFinite { index });
            }
            let d = body.position.distance(self.boundary.center);
            if d + radius > boundary + CONTAINMENT_EPSILON {
                return Err(ConfigError::BodyOutside { index });
            }
        }
        if !(self.gravity.is_finite() && self.gravity >= 0.0) {
            return Err(ConfigError::Gravity(self.gravity));
        }
        if !(self.restitution.is_finite() && self.restitution >= 0.0) {
            return Err(ConfigError::Restitution(self.restitution));
        }
        self.friction.validate()?;
        check_threshold("bounce_sound_threshold", self.bounce_sound_threshold)?;
        if let Some(cooldown) = self.sound_cooldown {
            check_threshold("sound_cooldown", cooldown)?;
        }
        if self.first_note >= NOTE_COUNT {
            return Err(ConfigError::FirstNote(self.first_note));
        }
        if let Some(p) = self.perturbation {
            if !(p.probability.is_finite() && (0.0..=1.0).contains(&p.probability)) {
                return Err(ConfigError::Perturbation(format!(
                    "probability must be in [0, 1], got {}",
                    p.probability
                )));
            }
            if !(p.max_impulse.is_finite() && p.max_impulse >= 0.0) {
                return Err(ConfigError::Perturbation(format!(
                    "max impulse must be non-negative, got {}",
                    p.max_impulse
                )));
            }
        }
        Ok(())
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Threshold { name, value })
    }
}
