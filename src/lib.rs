//! Circle Bounce - a ball bouncing inside a circular boundary
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, boundary collisions, bounce events)
//! - `runner`: Fixed-cadence loop driving the simulation
//! - `renderer`: Renderer interface plus log and text renderers
//! - `audio`: Bounce note queue and playback worker
//! - `settings`: Named presets and JSON configuration files

pub mod audio;
pub mod renderer;
pub mod runner;
pub mod settings;
pub mod sim;

pub use runner::{Runner, StopHandle};
pub use settings::Preset;
pub use sim::{BounceEvent, CircleBody, Simulation, SimulationConfig};

use glam::DVec2;

/// RGB color, 0-255 per channel
pub type Color = [u8; 3];

/// Simulation constants
pub mod consts {
    /// Fixed simulation rate (one tick per rendered frame)
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f64 = 1.0 / SIM_HZ as f64;
    /// Maximum ticks per loop iteration to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Screen dimensions used by the default scene
    pub const WIDTH: f64 = 600.0;
    pub const HEIGHT: f64 = 600.0;

    /// Boundary defaults
    pub const BOUNDARY_RADIUS: f64 = 250.0;

    /// Body defaults
    pub const BODY_RADIUS: f64 = 30.0;
    pub const GRAVITY: f64 = 0.5;
    pub const FRICTION: f64 = 0.99;
    pub const BOUNCE_FACTOR: f64 = 0.8;

    /// Trail history kept per body
    pub const TRAIL_LENGTH: usize = 100;

    /// Number of distinct notes (MIDI range)
    pub const NOTE_COUNT: u8 = 128;
    /// Middle C
    pub const DEFAULT_FIRST_NOTE: u8 = 60;

    /// Slack allowed on the containment check
    pub const CONTAINMENT_EPSILON: f64 = 1e-6;
}

/// Velocity vector from a speed and a heading in degrees
///
/// Screen coordinates: 0° points right, 90° points down.
#[inline]
pub fn velocity_from_polar(speed: f64, angle_degrees: f64) -> DVec2 {
    let theta = angle_degrees.to_radians();
    DVec2::new(speed * theta.cos(), speed * theta.sin())
}

/// Rainbow color for the `index`-th of `len` trail points
///
/// Hue sweeps the full wheel once across the trail, oldest point at red.
pub fn rainbow_color(index: usize, len: usize) -> Color {
    if len == 0 {
        return [255, 0, 0];
    }
    let hue = ((index % len) * 6) as f64 / len as f64;
    let sector = hue.floor() as u32;
    let f = hue - hue.floor();
    let up = (f * 255.0).round() as u8;
    let down = 255 - up;
    match sector {
        0 => [255, up, 0],
        1 => [down, 255, 0],
        2 => [0, 255, up],
        3 => [0, down, 255],
        4 => [up, 0, 255],
        _ => [255, 0, down],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_from_polar() {
        let v = velocity_from_polar(10.0, 90.0);
        assert!(v.x.abs() < 1e-9);
        assert!((v.y - 10.0).abs() < 1e-9);

        let v = velocity_from_polar(5.0, 180.0);
        assert!((v.x + 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_rainbow_color_endpoints() {
        assert_eq!(rainbow_color(0, 100), [255, 0, 0]);
        assert_eq!(rainbow_color(0, 0), [255, 0, 0]);
        // A third of the way round is pure green
        assert_eq!(rainbow_color(1, 3), [0, 255, 0]);
        assert_eq!(rainbow_color(2, 3), [0, 0, 255]);
    }
}
