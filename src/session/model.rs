use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::library::Track;
use crate::player::LoopMode;

/// The in-memory playback session owned by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    /// Play order; duplicates allowed.
    pub playlist: Vec<Track>,
    /// Always `< playlist.len()` when the playlist is non-empty.
    pub current_index: usize,
    /// Seconds into the current track.
    pub current_time: f64,
    pub is_shuffle: bool,
    pub loop_mode: LoopMode,
    /// Output volume in `[0, 1]`.
    pub volume: f32,
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self {
            playlist: Vec::new(),
            current_index: 0,
            current_time: 0.0,
            is_shuffle: false,
            loop_mode: LoopMode::NoLoop,
            volume: 1.0,
        }
    }
}

impl PlaybackSession {
    pub fn is_empty(&self) -> bool {
        self.playlist.is_empty()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.playlist.get(self.current_index)
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 >= self.playlist.len()
    }
}

/// The persisted schema.
///
/// Loop-all and the live playing flag are deliberately absent: a restored
/// session comes back with loop-single or no loop, and always paused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub playlist: Vec<Track>,
    pub current_index: usize,
    pub current_time: f64,
    pub is_shuffle: bool,
    pub is_loop: bool,
    pub volume: f32,
}

impl From<&PlaybackSession> for StoredSession {
    fn from(s: &PlaybackSession) -> Self {
        Self {
            playlist: s.playlist.clone(),
            current_index: s.current_index,
            current_time: s.current_time,
            is_shuffle: s.is_shuffle,
            is_loop: s.loop_mode.is_loop(),
            volume: s.volume,
        }
    }
}

impl TryFrom<StoredSession> for PlaybackSession {
    type Error = PersistenceError;

    fn try_from(s: StoredSession) -> Result<Self, Self::Error> {
        if !s.playlist.is_empty() && s.current_index >= s.playlist.len() {
            return Err(PersistenceError::Shape(format!(
                "currentIndex {} is outside a playlist of {}",
                s.current_index,
                s.playlist.len()
            )));
        }
        if !s.current_time.is_finite() || !s.volume.is_finite() {
            return Err(PersistenceError::Shape(
                "currentTime and volume must be finite".to_string(),
            ));
        }

        let empty = s.playlist.is_empty();
        Ok(Self {
            current_index: if empty { 0 } else { s.current_index },
            current_time: if empty { 0.0 } else { s.current_time.max(0.0) },
            playlist: s.playlist,
            is_shuffle: s.is_shuffle,
            loop_mode: if s.is_loop {
                LoopMode::LoopOne
            } else {
                LoopMode::NoLoop
            },
            volume: s.volume.clamp(0.0, 1.0),
        })
    }
}

pub fn encode_session(session: &PlaybackSession) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(&StoredSession::from(session))?)
}

pub fn decode_session(raw: &str) -> Result<PlaybackSession, PersistenceError> {
    let stored: StoredSession = serde_json::from_str(raw)?;
    PlaybackSession::try_from(stored)
}
