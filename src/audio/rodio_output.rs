use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use super::port::{AudioOutputPort, MediaEvent};
use super::sink::{create_sink_at, secs_to_duration};
use crate::error::PlaybackStartError;
use crate::library::resolve_media_path;

/// Minimum clock movement between two reported time updates.
const TICK_SECS: f64 = 0.25;

/// Desktop output backed by a `rodio` sink.
///
/// Media locators are served from `media_root`. rodio has no event stream,
/// so play/pause events are recorded as commands succeed and end-of-track is
/// detected by polling in [`drain_events`](AudioOutputPort::drain_events).
pub struct RodioOutput {
    stream: OutputStream,
    media_root: PathBuf,
    loaded: Option<PathBuf>,
    sink: Option<Sink>,
    // Position the current sink was started from; rodio counts from there.
    offset: Duration,
    playing: bool,
    volume: f32,
    last_tick: f64,
    events: VecDeque<MediaEvent>,
}

impl RodioOutput {
    /// Open the default output device.
    pub fn open_default(media_root: impl Into<PathBuf>) -> Result<Self, PlaybackStartError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlaybackStartError::Device(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which would land
        // in the middle of the command prompt.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            media_root: media_root.into(),
            loaded: None,
            sink: None,
            offset: Duration::ZERO,
            playing: false,
            volume: 1.0,
            last_tick: 0.0,
            events: VecDeque::new(),
        })
    }

    fn position(&self) -> Duration {
        self.sink
            .as_ref()
            .map_or(Duration::ZERO, |s| self.offset + s.get_pos())
    }

    /// Replace the sink with a fresh one for the loaded file, starting at
    /// `start_at` and keeping the current play/pause state.
    fn rebuild_at(&mut self, start_at: Duration) -> Result<Option<Duration>, PlaybackStartError> {
        let path = self.loaded.clone().ok_or(PlaybackStartError::NoSource)?;
        if let Some(old) = self.sink.take() {
            old.stop();
        }

        let (sink, total) = create_sink_at(&self.stream, &path, start_at)?;
        sink.set_volume(self.volume);
        if self.playing {
            sink.play();
        }
        self.sink = Some(sink);
        self.offset = start_at;
        self.last_tick = start_at.as_secs_f64();
        Ok(total)
    }
}

impl AudioOutputPort for RodioOutput {
    fn load(&mut self, url: &str) -> Result<(), PlaybackStartError> {
        let path = resolve_media_path(&self.media_root, url)?;
        debug!(path = %path.display(), "loading media");

        self.playing = false;
        self.loaded = Some(path);
        let total = match self.rebuild_at(Duration::ZERO) {
            Ok(total) => total,
            Err(e) => {
                self.loaded = None;
                return Err(e);
            }
        };

        self.events.push_back(MediaEvent::TimeUpdate(0.0));
        if let Some(total) = total {
            self.events
                .push_back(MediaEvent::DurationChange(total.as_secs_f64()));
        }
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlaybackStartError> {
        if self.loaded.is_none() {
            return Err(PlaybackStartError::NoSource);
        }

        // A drained sink has nothing left to play; start the file over.
        if self.sink.as_ref().is_none_or(Sink::empty) {
            self.rebuild_at(Duration::ZERO)?;
            self.events.push_back(MediaEvent::TimeUpdate(0.0));
        }
        if let Some(sink) = &self.sink {
            sink.play();
        }
        if !self.playing {
            self.playing = true;
            self.events.push_back(MediaEvent::Play);
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        if self.playing {
            self.playing = false;
            self.events.push_back(MediaEvent::Pause);
        }
    }

    fn seek(&mut self, time: f64) {
        if self.loaded.is_none() {
            return;
        }
        let target = secs_to_duration(time);
        match self.rebuild_at(target) {
            Ok(_) => self
                .events
                .push_back(MediaEvent::TimeUpdate(target.as_secs_f64())),
            Err(e) => warn!(error = %e, "seek failed"),
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    fn current_time(&self) -> f64 {
        self.position().as_secs_f64()
    }

    fn drain_events(&mut self) -> Vec<MediaEvent> {
        if self.playing {
            let finished = self.sink.as_ref().is_none_or(Sink::empty);
            let now = self.position().as_secs_f64();
            let polled = poll_playing(finished, now, self.last_tick);
            if !polled.is_empty() {
                self.last_tick = now;
            }
            if finished {
                self.playing = false;
            }
            self.events.extend(polled);
        }
        self.events.drain(..).collect()
    }
}

/// Events a poll of a playing sink produces.
///
/// A drained sink reports its final position, a pause and the end of the
/// track. Otherwise the clock is reported once it has moved [`TICK_SECS`]
/// since `last_tick`.
pub(super) fn poll_playing(finished: bool, now: f64, last_tick: f64) -> Vec<MediaEvent> {
    if finished {
        vec![
            MediaEvent::TimeUpdate(now),
            MediaEvent::Pause,
            MediaEvent::Ended,
        ]
    } else if (now - last_tick).abs() >= TICK_SECS {
        vec![MediaEvent::TimeUpdate(now)]
    } else {
        Vec::new()
    }
}
