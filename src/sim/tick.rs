//! Fixed timestep simulation tick
//!
//! Advances every body once, in index order, and turns significant impacts
//! into note-carrying bounce events.

use glam::DVec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::body::CircleBody;
use super::config::Perturbation;
use super::events::BounceEvent;
use super::frame::Frame;
use super::state::Simulation;
use crate::consts::SIM_DT;

/// What one tick produced
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub frame: Frame,
    /// Bounces in detection order
    pub bounces: Vec<BounceEvent>,
}

impl Simulation {
    /// Advance the simulation by one fixed timestep
    pub fn tick(&mut self) -> TickOutcome {
        self.time_ticks += 1;

        let mut bounces = Vec::new();
        for (index, body) in self.bodies.iter_mut().enumerate() {
            if let Some(perturbation) = self.config.perturbation {
                perturb(body, &perturbation, &mut self.rng);
            }

            if let Some(impact) = body.step(SIM_DT, &self.boundary, &self.config) {
                let event = BounceEvent {
                    tick: self.time_ticks,
                    body: index,
                    note_index: self.notes.advance(),
                    strength: impact.speed,
                };
                log::debug!(
                    "Bounce: body {} note {} strength {:.2} normal ({:.2}, {:.2})",
                    index,
                    event.note_index,
                    event.strength,
                    impact.normal.x,
                    impact.normal.y
                );
                bounces.push(event);
            }
        }

        if let Some(sink) = self.sink.as_mut() {
            for event in &bounces {
                sink.send(*event);
            }
        }

        TickOutcome {
            frame: self.frame(),
            bounces,
        }
    }
}

/// Maybe kick a body in a random direction
fn perturb(body: &mut CircleBody, perturbation: &Perturbation, rng: &mut Pcg32) {
    if rng.random::<f64>() >= perturbation.probability {
        return;
    }
    let angle = rng.random_range(0.0..std::f64::consts::TAU);
    let magnitude = if perturbation.max_impulse > 0.0 {
        rng.random_range(0.0..perturbation.max_impulse)
    } else {
        0.0
    };
    body.velocity += DVec2::from_angle(angle) * magnitude;
}
