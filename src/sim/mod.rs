//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only (gravity is a per-tick increment)
//! - Seeded RNG only
//! - Stable iteration order (by body index)
//! - No rendering, audio or platform dependencies

pub mod body;
pub mod boundary;
pub mod collision;
pub mod config;
pub mod events;
pub mod frame;
pub mod state;
pub mod tick;

pub use body::CircleBody;
pub use boundary::Boundary;
pub use collision::{CollisionResult, body_boundary_collision, reflect_velocity};
pub use config::{
    BodyConfig, BounceSignificance, BoundaryConfig, ConfigError, FrictionModel, Launch,
    Perturbation, SimulationConfig,
};
pub use events::{BounceEvent, BounceSink, Impact, NoteCycle};
pub use frame::{BodySprite, CircleSprite, Frame, TrailPoint};
pub use state::Simulation;
pub use tick::TickOutcome;
