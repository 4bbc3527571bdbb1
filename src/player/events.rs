//! What the engine tells its observers.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::library::Track;

use super::types::{LoopMode, PlayerPhase};

/// A change in engine state, published to every subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// The queue was replaced wholesale.
    QueueReplaced { length: usize, index: usize },
    /// A different queue entry became current (or the same one was reloaded).
    TrackChanged { index: usize, track: Track },
    PlaybackChanged { phase: PlayerPhase, playing: bool },
    ModesChanged { shuffle: bool, loop_mode: LoopMode },
    TimeChanged { current: f64, duration: Option<f64> },
    VolumeChanged { volume: f32 },
    /// The session was reset to empty.
    Cleared,
}

/// Read-only view of the engine for UI consumers.
///
/// `is_playing` reflects the last event the output reported, not the last
/// command issued.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub playlist: Vec<Track>,
    pub current_index: usize,
    pub current_track: Option<Track>,
    pub phase: PlayerPhase,
    pub is_playing: bool,
    pub is_shuffle: bool,
    pub is_loop: bool,
    pub is_loop_all: bool,
    pub current_time: f64,
    pub duration: Option<f64>,
    pub volume: f32,
}

/// Fan-out to subscribers; disconnected receivers are dropped on the next
/// publish.
#[derive(Debug, Default)]
pub(super) struct Subscribers {
    senders: Vec<Sender<PlayerEvent>>,
}

impl Subscribers {
    pub(super) fn subscribe(&mut self) -> Receiver<PlayerEvent> {
        let (tx, rx) = mpsc::channel();
        self.senders.push(tx);
        rx
    }

    pub(super) fn publish(&mut self, event: PlayerEvent) {
        if self.senders.is_empty() {
            return;
        }
        self.senders.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub(super) fn len(&self) -> usize {
        self.senders.len()
    }
}
