use serde::{Deserialize, Serialize};

use crate::library::Track;

/// What the engine hands to the history recorder when a track starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// The track's resource locator.
    pub track_identity: String,
    pub display_name: String,
    pub category: String,
    pub source: PlaySource,
}

impl HistoryEntry {
    pub fn new(track: &Track, source: PlaySource) -> Self {
        Self {
            track_identity: track.path.clone(),
            display_name: track.name.clone(),
            category: track.category.clone(),
            source,
        }
    }
}

/// How the track came to be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PlaySource {
    /// Launched on its own; the queue is just this track.
    Single,
    /// Launched from a caller-supplied queue.
    Queue { position: usize, length: usize },
    /// Reached by moving forward through the queue.
    Advance {
        from: usize,
        to: usize,
        shuffle: bool,
        trigger: AdvanceTrigger,
        /// The queue wrapped from its last entry back to the first.
        wrapped: bool,
    },
    /// Reached by moving back through the queue.
    Previous { from: usize, to: usize },
    /// Loop-single restarted the track after it ended.
    LoopRestart { position: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdvanceTrigger {
    /// An explicit "next" command.
    Manual,
    /// The previous track finished playing.
    Ended,
}
