//! Character-grid renderer
//!
//! Draws the boundary outline, each trail and each body onto a `Canvas`
//! and writes the result to any `io::Write`.

use std::io::Write;

use super::shapes::Canvas;
use super::{RenderError, Renderer};
use crate::consts::{HEIGHT, WIDTH};
use crate::sim::Frame;

const BOUNDARY_CHAR: char = 'o';
const TRAIL_CHAR: char = '.';
const BODY_CHAR: char = '@';
/// Moves the cursor home and clears the screen
const ANSI_CLEAR: &str = "\x1b[H\x1b[2J";

pub struct TextRenderer<W: Write> {
    canvas: Canvas,
    out: W,
    /// Draw every n-th frame
    every: u64,
    clear_screen: bool,
}

impl<W: Write> TextRenderer<W> {
    /// Canvas of `cols` x `rows` covering the default window
    pub fn new(out: W, cols: usize, rows: usize) -> Self {
        Self {
            canvas: Canvas::new(cols, rows, WIDTH, HEIGHT),
            out,
            every: 1,
            clear_screen: false,
        }
    }

    pub fn every(mut self, every: u64) -> Self {
        self.every = every.max(1);
        self
    }

    /// Prefix each frame with an ANSI clear, for live terminal output
    pub fn clear_screen(mut self, clear: bool) -> Self {
        self.clear_screen = clear;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn rasterize(&mut self, frame: &Frame) {
        self.canvas.clear();
        self.canvas.outline(
            frame.boundary.position,
            frame.boundary.radius,
            BOUNDARY_CHAR,
        );
        for body in &frame.bodies {
            for point in &body.trail {
                self.canvas.plot(point.pos, TRAIL_CHAR);
            }
        }
        // Bodies last so they sit on top of every trail
        for body in &frame.bodies {
            self.canvas.disc(body.circle.position, body.circle.radius, BODY_CHAR);
        }
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn draw(&mut self, frame: &Frame) -> Result<(), RenderError> {
        if frame.tick % self.every != 0 {
            return Ok(());
        }
        self.rasterize(frame);
        if self.clear_screen {
            self.out.write_all(ANSI_CLEAR.as_bytes())?;
        }
        writeln!(self.out, "tick {}", frame.tick)?;
        self.out.write_all(self.canvas.to_text().as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}
