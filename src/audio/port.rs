use crate::error::PlaybackStartError;

/// Events reported by the output, mirroring what a native media element
/// emits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    /// The playback clock moved; seconds into the track.
    TimeUpdate(f64),
    /// The loaded track's length became known; seconds.
    DurationChange(f64),
    /// The track played to its end.
    Ended,
    /// Output actually started.
    Play,
    /// Output actually paused.
    Pause,
}

/// One exclusive audio output.
///
/// `load` replaces whatever was loaded before; a new load supersedes any
/// previous one that is still in flight. Only `load` and `play` can fail.
pub trait AudioOutputPort {
    /// Load the media at `url` (a `/media?file=...` locator), paused at 0.
    fn load(&mut self, url: &str) -> Result<(), PlaybackStartError>;

    /// Start or resume output. Success is confirmed later by [`MediaEvent::Play`].
    fn play(&mut self) -> Result<(), PlaybackStartError>;

    fn pause(&mut self);

    /// Jump to `time` seconds into the loaded media.
    fn seek(&mut self, time: f64);

    fn set_volume(&mut self, volume: f32);

    /// Live playback position in seconds.
    fn current_time(&self) -> f64;

    /// Take every event reported since the last call, oldest first.
    fn drain_events(&mut self) -> Vec<MediaEvent>;
}
