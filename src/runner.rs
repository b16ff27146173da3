//! Fixed-cadence loop driving the simulation
//!
//! Wall time is accumulated and converted into whole ticks, at most
//! `MAX_SUBSTEPS` per iteration. The latest frame is handed to the renderer
//! once per iteration. Stopping is cooperative and only observed between
//! ticks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::renderer::Renderer;
use crate::sim::{Frame, Simulation};

/// Longest wall-clock gap fed into the accumulator in one iteration
const MAX_FRAME_TIME: f64 = 0.1;

/// Cloneable request to stop a running loop
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub struct Runner<R: Renderer> {
    sim: Simulation,
    renderer: R,
    stop: StopHandle,
    accumulator: f64,
}

impl<R: Renderer> Runner<R> {
    pub fn new(sim: Simulation, renderer: R) -> Self {
        Self {
            sim,
            renderer,
            stop: StopHandle::default(),
            accumulator: 0.0,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn into_parts(self) -> (Simulation, R) {
        (self.sim, self.renderer)
    }

    /// Run paced at `SIM_HZ` until stopped; returns ticks run
    pub fn run(&mut self) -> u64 {
        self.paced(None)
    }

    /// Run paced for at most `duration` of wall time, or until stopped
    pub fn run_for(&mut self, duration: Duration) -> u64 {
        self.paced(Some(Instant::now() + duration))
    }

    /// Run `n` ticks back to back, drawing each one
    pub fn run_ticks(&mut self, n: u64) -> u64 {
        let mut ran = 0;
        while ran < n && !self.stop.is_stopped() {
            let frame = self.sim.tick().frame;
            self.draw(&frame);
            ran += 1;
        }
        ran
    }

    fn paced(&mut self, deadline: Option<Instant>) -> u64 {
        let start_tick = self.sim.time_ticks();
        let mut last = Instant::now();
        self.accumulator = 0.0;
        log::info!("Runner started at {:.0} Hz", 1.0 / SIM_DT);

        while !self.stop.is_stopped() {
            let now = Instant::now();
            if deadline.is_some_and(|d| now >= d) {
                break;
            }
            let dt = now.duration_since(last).as_secs_f64().min(MAX_FRAME_TIME);
            last = now;
            self.accumulator += dt;

            let mut latest: Option<Frame> = None;
            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                if self.stop.is_stopped() {
                    break;
                }
                latest = Some(self.sim.tick().frame);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
            if let Some(frame) = latest {
                self.draw(&frame);
            }

            let wait = (SIM_DT - self.accumulator).max(0.0);
            thread::sleep(Duration::from_secs_f64(wait));
        }

        let ran = self.sim.time_ticks() - start_tick;
        log::info!("Runner stopped after {} ticks", ran);
        ran
    }

    fn draw(&mut self, frame: &Frame) {
        if let Err(e) = self.renderer.draw(frame) {
            log::warn!("Render failed at tick {}: {}", frame.tick, e);
        }
    }
}
