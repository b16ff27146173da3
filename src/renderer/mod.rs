//! Rendering module
//!
//! Renderers consume `Frame` snapshots and never touch the simulation.
//! Two are provided: a log-only renderer for headless runs and a text
//! renderer that rasterizes the scene onto a character grid.

pub mod shapes;
pub mod text;

use thiserror::Error;

use crate::sim::Frame;

pub use text::TextRenderer;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("render target unavailable: {0}")]
    Unavailable(String),
    #[error("failed to write frame: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that can draw a frame
pub trait Renderer {
    fn draw(&mut self, frame: &Frame) -> Result<(), RenderError>;
}

/// Renderer that only traces a frame summary every `every` ticks
#[derive(Debug, Clone, Copy)]
pub struct LogRenderer {
    every: u64,
}

impl LogRenderer {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
        }
    }
}

impl Default for LogRenderer {
    fn default() -> Self {
        Self::new(crate::consts::SIM_HZ as u64)
    }
}

impl Renderer for LogRenderer {
    fn draw(&mut self, frame: &Frame) -> Result<(), RenderError> {
        if frame.tick % self.every != 0 {
            return Ok(());
        }
        for (i, body) in frame.bodies.iter().enumerate() {
            log::trace!(
                "tick {} body {} at ({:.1}, {:.1}), trail {}",
                frame.tick,
                i,
                body.circle.position.x,
                body.circle.position.y,
                body.trail.len()
            );
        }
        Ok(())
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn draw(&mut self, frame: &Frame) -> Result<(), RenderError> {
        (**self).draw(frame)
    }
}
