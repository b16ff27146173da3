//! Bounce notifications and the note counter
//!
//! The simulation only decides *that* a bounce deserves a note and which
//! note index it gets. Mapping notes to sound is the audio side's job.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::NOTE_COUNT;

/// A significant contact reported by a body step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    /// Normal speed into the wall just before the bounce
    pub speed: f64,
    /// Outward contact normal
    pub normal: DVec2,
}

/// Notification of a significant bounce, handed to the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BounceEvent {
    /// Tick on which the bounce was detected
    pub tick: u64,
    /// Index of the body that bounced
    pub body: usize,
    /// Note to play, 0..128
    pub note_index: u8,
    /// Impact speed (normal component), for loudness
    pub strength: f64,
}

/// Monotonic note counter cycling through 0..128
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteCycle {
    next: u8,
}

impl NoteCycle {
    pub fn new(first: u8) -> Self {
        Self {
            next: first % NOTE_COUNT,
        }
    }

    /// Note the next bounce will get
    pub fn peek(&self) -> u8 {
        self.next
    }

    /// Take the current note and move to the following one
    pub fn advance(&mut self) -> u8 {
        let note = self.next;
        self.next = (self.next + 1) % NOTE_COUNT;
        note
    }
}

/// Receiver for bounce events
///
/// Implementations must not block: `send` is called from inside the
/// simulation tick.
pub trait BounceSink {
    fn send(&mut self, event: BounceEvent);
}

/// Collects events in memory (handy for headless runs)
impl BounceSink for Vec<BounceEvent> {
    fn send(&mut self, event: BounceEvent) {
        self.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_cycle_wraps_after_full_octave_range() {
        let mut notes = NoteCycle::new(60);
        let start = notes.peek();
        for _ in 0..128 {
            notes.advance();
        }
        assert_eq!(notes.peek(), start);
    }

    #[test]
    fn test_note_cycle_is_monotonic_mod_128() {
        let mut notes = NoteCycle::new(126);
        assert_eq!(notes.advance(), 126);
        assert_eq!(notes.advance(), 127);
        assert_eq!(notes.advance(), 0);
        assert_eq!(notes.advance(), 1);
    }

    #[test]
    fn test_note_cycle_clamps_start() {
        assert_eq!(NoteCycle::new(130).peek(), 2);
    }

    #[test]
    fn test_vec_sink_keeps_order() {
        let mut sink: Vec<BounceEvent> = Vec::new();
        for note_index in [3u8, 4, 5] {
            sink.send(BounceEvent {
                tick: 1,
                body: 0,
                note_index,
                strength: 1.0,
            });
        }
        let notes: Vec<u8> = sink.iter().map(|e| e.note_index).collect();
        assert_eq!(notes, vec![3, 4, 5]);
    }
}
