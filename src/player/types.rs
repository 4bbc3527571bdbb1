use crate::audio::MediaEvent;
use crate::config::Settings;

/// End-of-track policy. Loop-single and loop-all can never both be active.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum LoopMode {
    /// Stop after the last track of the queue.
    #[default]
    NoLoop,
    /// Repeat the current track when it ends.
    LoopOne,
    /// Wrap around to the start of the queue.
    LoopAll,
}

impl LoopMode {
    /// Next mode in the `NoLoop -> LoopOne -> LoopAll -> NoLoop` ring.
    pub fn cycle(self) -> Self {
        match self {
            Self::NoLoop => Self::LoopOne,
            Self::LoopOne => Self::LoopAll,
            Self::LoopAll => Self::NoLoop,
        }
    }

    pub fn is_loop(self) -> bool {
        self == Self::LoopOne
    }

    pub fn is_loop_all(self) -> bool {
        self == Self::LoopAll
    }
}

/// Where the engine is in its playback lifecycle.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PlayerPhase {
    /// Nothing loaded.
    #[default]
    Idle,
    /// A track was loaded and play requested; waiting for the output.
    Loading,
    Playing,
    Paused,
    /// The last track finished and no loop policy applied.
    Ended,
}

impl PlayerPhase {
    pub fn is_playing(self) -> bool {
        self == Self::Playing
    }

    /// Phase after the output reports `event`.
    ///
    /// Only `Play`, `Pause` and `Ended` move the machine; time and duration
    /// updates never do. An idle engine ignores stray output events.
    pub fn on_media_event(self, event: &MediaEvent) -> Self {
        match (self, event) {
            (Self::Idle, _) => Self::Idle,
            (_, MediaEvent::Play) => Self::Playing,
            (Self::Ended, MediaEvent::Pause) => Self::Ended,
            (_, MediaEvent::Pause) => Self::Paused,
            (_, MediaEvent::Ended) => Self::Ended,
            (phase, MediaEvent::TimeUpdate(_) | MediaEvent::DurationChange(_)) => phase,
        }
    }
}

/// Which track starts are reported to the history recorder beyond the
/// always-reported ones (launch, next, loop-all rollover).
///
/// The defaults keep "previous" and loop-single restarts out of the history.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct HistoryPolicy {
    pub notify_on_previous: bool,
    pub notify_on_loop_restart: bool,
}

/// Engine tuning, usually derived from [`Settings`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerOptions {
    /// Seconds after which "previous" restarts the current track.
    pub restart_threshold_secs: f64,
    /// Minimum clock movement before a time update is persisted.
    pub time_flush_interval_secs: f64,
    /// Streaming endpoint used to build media locators.
    pub media_endpoint: String,
    pub history: HistoryPolicy,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for PlayerOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            restart_threshold_secs: settings.playback.restart_threshold_secs,
            time_flush_interval_secs: settings.playback.time_flush_interval_secs,
            media_endpoint: settings.media.endpoint.clone(),
            history: settings.history.policy(),
        }
    }
}
