//! Simulation state
//!
//! Owns the boundary, the bodies, the note counter and the RNG. Nothing in
//! here is global; collaborators are attached explicitly.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::body::CircleBody;
use super::boundary::Boundary;
use super::config::{ConfigError, SimulationConfig};
use super::events::{BounceSink, NoteCycle};
use super::frame::Frame;

/// A bounded world: one boundary circle and the bodies inside it
pub struct Simulation {
    pub(super) config: SimulationConfig,
    pub(super) boundary: Boundary,
    pub(super) bodies: Vec<CircleBody>,
    /// Cycling note index handed to the next significant bounce
    pub(super) notes: NoteCycle,
    /// Source for random perturbations
    pub(super) rng: Pcg32,
    /// Simulation tick counter
    pub(super) time_ticks: u64,
    pub(super) sink: Option<Box<dyn BounceSink>>,
}

impl Simulation {
    /// Validate `config` and build the world, seeding the RNG from `config.seed`
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        let rng = Pcg32::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }

    /// Like `new`, with an injected randomness source
    pub fn with_rng(config: SimulationConfig, rng: Pcg32) -> Result<Self, ConfigError> {
        config.validate()?;

        let boundary = Boundary::from(config.boundary);
        let bodies = config.bodies.iter().map(CircleBody::from_config).collect();
        let notes = NoteCycle::new(config.first_note);

        log::info!(
            "Simulation ready: {} bodies, boundary radius {}, friction {:?}",
            config.bodies.len(),
            boundary.radius,
            config.friction
        );

        Ok(Self {
            config,
            boundary,
            bodies,
            notes,
            rng,
            time_ticks: 0,
            sink: None,
        })
    }

    /// Forward bounce events to `sink` on every tick
    pub fn with_sink(mut self, sink: impl BounceSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn bodies(&self) -> &[CircleBody] {
        &self.bodies
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Note the next significant bounce will play
    pub fn next_note(&self) -> u8 {
        self.notes.peek()
    }

    /// Snapshot of the current state for a renderer
    pub fn frame(&self) -> Frame {
        Frame::capture(self.time_ticks, &self.boundary, &self.bodies)
    }
}
