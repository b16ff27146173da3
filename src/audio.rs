//! Bounce audio: note queue and playback worker
//!
//! The simulation pushes bounce events into a bounded queue; a worker thread
//! turns them into procedurally generated notes. Nothing here can stall a
//! tick: a full queue drops the note, a dead worker is logged once.

use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};

use thiserror::Error;

use crate::sim::{BounceEvent, BounceSink};

/// Default number of notes that may wait for the worker
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;
/// Output sample rate for synthesized notes
pub const SAMPLE_RATE: u32 = 44_100;
/// Length of one synthesized note (seconds)
pub const NOTE_DURATION: f32 = 0.25;
/// Impact speed that plays at full volume
const FULL_VOLUME_STRENGTH: f64 = 20.0;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
    #[error("failed to start audio worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Equal-tempered pitch of a MIDI note (A4 = 69 = 440 Hz)
#[inline]
pub fn midi_to_frequency(note: u8) -> f32 {
    440.0 * 2f32.powf((note as f32 - 69.0) / 12.0)
}

/// Volume controls shared by all players
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioSettings {
    master_volume: f32,
    muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            muted: false,
        }
    }
}

impl AudioSettings {
    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }
}

/// Something that can sound a bounce
pub trait NotePlayer: Send {
    fn play(&mut self, event: &BounceEvent) -> Result<(), AudioError>;
}

/// Player that only logs the notes it would play
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPlayer;

impl NotePlayer for LogPlayer {
    fn play(&mut self, event: &BounceEvent) -> Result<(), AudioError> {
        log::info!(
            "Note {} ({:.1} Hz), strength {:.2}",
            event.note_index,
            midi_to_frequency(event.note_index),
            event.strength
        );
        Ok(())
    }
}

/// Destination for synthesized samples (a device, a file, a test buffer)
pub trait SampleOutput: Send {
    fn write(&mut self, samples: &[f32]) -> Result<(), AudioError>;
}

impl<F> SampleOutput for F
where
    F: FnMut(&[f32]) -> Result<(), AudioError> + Send,
{
    fn write(&mut self, samples: &[f32]) -> Result<(), AudioError> {
        self(samples)
    }
}

/// Synthesizes a decaying sine for every bounce
pub struct SynthPlayer<O: SampleOutput> {
    settings: AudioSettings,
    sample_rate: u32,
    output: O,
}

impl<O: SampleOutput> SynthPlayer<O> {
    pub fn new(settings: AudioSettings, output: O) -> Self {
        Self {
            settings,
            sample_rate: SAMPLE_RATE,
            output,
        }
    }
}

impl<O: SampleOutput> NotePlayer for SynthPlayer<O> {
    fn play(&mut self, event: &BounceEvent) -> Result<(), AudioError> {
        let vol = self.settings.effective_volume() * strength_gain(event.strength);
        if vol <= 0.0 {
            return Ok(());
        }
        let samples = synthesize_note(
            midi_to_frequency(event.note_index),
            vol,
            NOTE_DURATION,
            self.sample_rate,
        );
        self.output.write(&samples)
    }
}

/// Harder hits play louder
fn strength_gain(strength: f64) -> f32 {
    (strength / FULL_VOLUME_STRENGTH).clamp(0.1, 1.0) as f32
}

/// Sine oscillator with an exponential decay envelope down to 1% volume
pub fn synthesize_note(frequency: f32, volume: f32, duration: f32, sample_rate: u32) -> Vec<f32> {
    let count = (duration * sample_rate as f32).round() as usize;
    let step = std::f32::consts::TAU * frequency / sample_rate as f32;
    (0..count)
        .map(|i| {
            let t = i as f32 / count as f32;
            let envelope = volume * 0.01f32.powf(t);
            envelope * (step * i as f32).sin()
        })
        .collect()
}

/// Bounded, non-blocking sender side of the note queue
#[derive(Debug, Clone)]
pub struct NoteQueue {
    tx: SyncSender<BounceEvent>,
    disconnect_logged: bool,
}

impl NoteQueue {
    /// Queue with its receiving end (capacity is at least one)
    pub fn bounded(capacity: usize) -> (Self, Receiver<BounceEvent>) {
        let (tx, rx) = mpsc::sync_channel(capacity.max(1));
        (
            Self {
                tx,
                disconnect_logged: false,
            },
            rx,
        )
    }
}

impl BounceSink for NoteQueue {
    fn send(&mut self, event: BounceEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                log::debug!("Note queue full, dropping note {}", event.note_index);
            }
            Err(TrySendError::Disconnected(_)) => {
                if !self.disconnect_logged {
                    log::warn!("Audio worker gone - bounce notes disabled");
                    self.disconnect_logged = true;
                }
            }
        }
    }
}

/// Background thread draining the note queue into a player
pub struct AudioWorker {
    handle: JoinHandle<u64>,
}

impl AudioWorker {
    /// Start the worker; it stops once every `NoteQueue` clone is dropped
    pub fn spawn<P>(capacity: usize, player: P) -> Result<(NoteQueue, AudioWorker), AudioError>
    where
        P: NotePlayer + 'static,
    {
        let (queue, rx) = NoteQueue::bounded(capacity);
        let handle = thread::Builder::new()
            .name("bounce-audio".into())
            .spawn(move || drain(rx, player))?;
        log::info!("Audio worker started (queue capacity {})", capacity.max(1));
        Ok((queue, AudioWorker { handle }))
    }

    /// Wait for the worker to finish; returns the number of notes played
    pub fn join(self) -> u64 {
        self.handle.join().unwrap_or_else(|_| {
            log::error!("Audio worker panicked");
            0
        })
    }
}

fn drain<P: NotePlayer>(rx: Receiver<BounceEvent>, mut player: P) -> u64 {
    let mut played = 0;
    for event in rx {
        match player.play(&event) {
            Ok(()) => played += 1,
            Err(e) => log::warn!("Failed to play note {}: {}", event.note_index, e),
        }
    }
    log::info!("Audio worker stopped after {} notes", played);
    played
}
