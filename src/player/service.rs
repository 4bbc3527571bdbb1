use std::sync::mpsc::Receiver;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::audio::{AudioOutputPort, MediaEvent};
use crate::history::{AdvanceTrigger, HistoryEntry, HistoryRecorder, PlaySource};
use crate::library::Track;
use crate::session::{PlaybackSession, SessionStore};

use super::events::{PlayerEvent, PlayerSnapshot, Subscribers};
use super::types::{LoopMode, PlayerOptions, PlayerPhase};

/// The playback engine.
///
/// Owns the output exclusively; nothing else may drive it. Session writes
/// happen on meaningful transitions (queue, index, mode, volume, seek,
/// pause/end) and on time updates only once the clock has moved
/// `time_flush_interval_secs` since the last write.
pub struct PlayerService<A, S, H> {
    output: A,
    store: S,
    history: H,
    options: PlayerOptions,
    session: PlaybackSession,
    phase: PlayerPhase,
    duration: Option<f64>,
    last_flushed_time: f64,
    rng: StdRng,
    subscribers: Subscribers,
}

impl<A, S, H> PlayerService<A, S, H>
where
    A: AudioOutputPort,
    S: SessionStore,
    H: HistoryRecorder,
{
    /// Create an engine with an empty session. Call [`restore`](Self::restore)
    /// to pick up the stored one.
    pub fn new(output: A, store: S, history: H, options: PlayerOptions) -> Self {
        Self {
            output,
            store,
            history,
            options,
            session: PlaybackSession::default(),
            phase: PlayerPhase::Idle,
            duration: None,
            last_flushed_time: 0.0,
            rng: StdRng::from_entropy(),
            subscribers: Subscribers::default(),
        }
    }

    /// Use a deterministic shuffle sequence.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Load the stored session and cue its current track without playing.
    ///
    /// The output gets the stored volume, the track and the stored position;
    /// `play()` is never called, so a restart never resumes audio by itself.
    pub fn restore(&mut self) {
        self.session = self.store.load();
        self.duration = None;
        self.last_flushed_time = self.session.current_time;

        self.publish(PlayerEvent::QueueReplaced {
            length: self.session.playlist.len(),
            index: self.session.current_index,
        });
        self.publish_modes();
        self.output.set_volume(self.session.volume);
        self.publish(PlayerEvent::VolumeChanged {
            volume: self.session.volume,
        });

        if self.session.is_empty() {
            self.set_phase(PlayerPhase::Idle);
            return;
        }

        let time = self.session.current_time;
        self.load_current(time);
        self.set_phase(PlayerPhase::Paused);
        self.publish_track();
        self.publish_time();
        // Writes back the normalized form (clamped time and volume).
        self.persist();
        info!(
            tracks = self.session.playlist.len(),
            index = self.session.current_index,
            time,
            "restored playback session (paused)"
        );
    }

    /// Play `track` now, optionally replacing the queue with `playlist`.
    ///
    /// Without a playlist (or with an empty one) the queue becomes `[track]`.
    /// The current index is the first queue entry with the same path as
    /// `track`, or 0 when there is none; in that case the queue's first entry
    /// is what gets loaded and reported, keeping index and track in step.
    pub fn play_song(&mut self, track: Track, playlist: Option<Vec<Track>>) {
        let (playlist, source) = match playlist.filter(|p| !p.is_empty()) {
            Some(playlist) => {
                let position = playlist
                    .iter()
                    .position(|t| t.path == track.path)
                    .unwrap_or(0);
                let source = PlaySource::Queue {
                    position,
                    length: playlist.len(),
                };
                (playlist, source)
            }
            None => (vec![track], PlaySource::Single),
        };

        let index = match source {
            PlaySource::Queue { position, .. } => position,
            _ => 0,
        };
        self.replace_queue(playlist, index);
        self.notify_history(source);
        self.start_current();
    }

    /// Replace the queue and start playing at `start_index`.
    ///
    /// An out-of-range start falls back to 0; an empty playlist is ignored.
    pub fn play_playlist(&mut self, playlist: Vec<Track>, start_index: usize) {
        if playlist.is_empty() {
            debug!("play_playlist with an empty playlist ignored");
            return;
        }
        let index = if start_index < playlist.len() {
            start_index
        } else {
            warn!(start_index, length = playlist.len(), "start index out of range, using 0");
            0
        };
        let length = playlist.len();

        self.replace_queue(playlist, index);
        self.notify_history(PlaySource::Queue {
            position: index,
            length,
        });
        self.start_current();
    }

    /// Pause when playing, otherwise ask the output to play.
    ///
    /// `is_playing` only flips once the output confirms with an event.
    pub fn toggle_play(&mut self) {
        if self.session.is_empty() || self.phase == PlayerPhase::Idle {
            debug!("toggle_play with nothing loaded");
            return;
        }

        match self.phase {
            PlayerPhase::Playing => self.output.pause(),
            PlayerPhase::Ended => {
                self.output.seek(0.0);
                self.session.current_time = 0.0;
                self.set_phase(PlayerPhase::Loading);
                self.try_play();
                self.publish_time();
                self.persist();
            }
            _ => self.try_play(),
        }
    }

    /// Move forward in the queue: a uniformly random entry when shuffling
    /// (the current one included), otherwise the next entry, wrapping at the
    /// end.
    pub fn next_track(&mut self) {
        self.advance(AdvanceTrigger::Manual);
    }

    /// Restart the current track when it has played past the restart
    /// threshold, otherwise move back one entry, wrapping at the start.
    pub fn prev_track(&mut self) {
        let len = self.session.playlist.len();
        if len == 0 {
            debug!("prev_track on an empty queue");
            return;
        }

        let position = self.output.current_time();
        if position > self.options.restart_threshold_secs {
            debug!(position, "restarting current track");
            self.output.seek(0.0);
            self.session.current_time = 0.0;
            self.publish_time();
            self.persist();
            return;
        }

        let from = self.session.current_index;
        let to = if from == 0 { len - 1 } else { from - 1 };
        self.session.current_index = to;
        if self.options.history.notify_on_previous {
            self.notify_history(PlaySource::Previous { from, to });
        }
        self.start_current();
    }

    /// Flip shuffle. The stored queue order is never touched; shuffle only
    /// changes how the next entry is picked.
    pub fn toggle_shuffle(&mut self) {
        self.session.is_shuffle = !self.session.is_shuffle;
        debug!(shuffle = self.session.is_shuffle, "shuffle toggled");
        self.publish_modes();
        self.persist();
    }

    /// Step through `NoLoop -> LoopOne -> LoopAll -> NoLoop`.
    pub fn toggle_loop(&mut self) {
        self.session.loop_mode = self.session.loop_mode.cycle();
        debug!(loop_mode = ?self.session.loop_mode, "loop mode changed");
        self.publish_modes();
        self.persist();
    }

    /// Jump to `time` seconds in the current track.
    pub fn seek(&mut self, time: f64) {
        self.output.seek(time);
        if !self.session.is_empty() && time.is_finite() {
            self.session.current_time = time.max(0.0);
            self.publish_time();
            self.persist();
        }
    }

    /// Set the output volume, clamped to `[0, 1]`. Non-finite values are
    /// ignored so the output and the session never disagree.
    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            debug!(volume, "ignoring non-finite volume");
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.output.set_volume(volume);
        self.session.volume = volume;
        self.publish(PlayerEvent::VolumeChanged { volume });
        self.persist();
    }

    /// Apply every event the output has reported since the last pump.
    /// Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let events = self.output.drain_events();
        let count = events.len();
        for event in events {
            self.handle_media_event(event);
        }
        count
    }

    /// Apply one output event.
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        let before = self.phase;
        self.set_phase(before.on_media_event(&event));

        match event {
            MediaEvent::TimeUpdate(time) => {
                if self.phase == PlayerPhase::Idle || !time.is_finite() {
                    return;
                }
                self.session.current_time = time.max(0.0);
                self.publish_time();
                let moved = (self.session.current_time - self.last_flushed_time).abs();
                if moved >= self.options.time_flush_interval_secs {
                    self.persist();
                }
            }
            MediaEvent::DurationChange(duration) => {
                if self.phase != PlayerPhase::Idle && duration.is_finite() {
                    self.duration = Some(duration.max(0.0));
                    self.publish_time();
                }
            }
            MediaEvent::Play => {}
            MediaEvent::Pause => {
                if before != self.phase {
                    self.persist();
                }
            }
            MediaEvent::Ended => {
                if before != PlayerPhase::Idle {
                    self.on_ended();
                }
            }
        }
    }

    /// Reset to the canonical empty session and stop output.
    pub fn clear(&mut self) {
        self.output.pause();
        self.session = PlaybackSession::default();
        self.output.set_volume(self.session.volume);
        self.duration = None;
        self.set_phase(PlayerPhase::Idle);
        self.publish(PlayerEvent::Cleared);
        self.persist();
        info!("playback session cleared");
    }

    /// Write the session now, regardless of the flush policy.
    pub fn flush(&mut self) {
        self.persist();
    }

    /// Register an observer. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<PlayerEvent> {
        self.subscribers.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            playlist: self.session.playlist.clone(),
            current_index: self.session.current_index,
            current_track: self.session.current_track().cloned(),
            phase: self.phase,
            is_playing: self.is_playing(),
            is_shuffle: self.session.is_shuffle,
            is_loop: self.session.loop_mode.is_loop(),
            is_loop_all: self.session.loop_mode.is_loop_all(),
            current_time: self.session.current_time,
            duration: self.duration,
            volume: self.session.volume,
        }
    }

    pub fn playlist(&self) -> &[Track] {
        &self.session.playlist
    }

    pub fn current_index(&self) -> usize {
        self.session.current_index
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.session.current_track()
    }

    pub fn phase(&self) -> PlayerPhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase.is_playing()
    }

    pub fn is_shuffle(&self) -> bool {
        self.session.is_shuffle
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.session.loop_mode
    }

    pub fn current_time(&self) -> f64 {
        self.session.current_time
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn volume(&self) -> f32 {
        self.session.volume
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn options(&self) -> &PlayerOptions {
        &self.options
    }

    pub fn output(&self) -> &A {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut A {
        &mut self.output
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    fn on_ended(&mut self) {
        match self.session.loop_mode {
            LoopMode::LoopOne => {
                debug!(index = self.session.current_index, "loop-single restart");
                self.output.seek(0.0);
                self.session.current_time = 0.0;
                self.set_phase(PlayerPhase::Loading);
                self.try_play();
                if self.options.history.notify_on_loop_restart {
                    self.notify_history(PlaySource::LoopRestart {
                        position: self.session.current_index,
                    });
                }
                self.publish_time();
                self.persist();
            }
            LoopMode::LoopAll => self.advance(AdvanceTrigger::Ended),
            LoopMode::NoLoop if !self.session.is_last() => self.advance(AdvanceTrigger::Ended),
            LoopMode::NoLoop => {
                debug!("end of queue");
                self.set_phase(PlayerPhase::Ended);
                self.persist();
            }
        }
    }

    fn advance(&mut self, trigger: AdvanceTrigger) {
        let len = self.session.playlist.len();
        if len == 0 {
            debug!("next_track on an empty queue");
            return;
        }

        let from = self.session.current_index;
        let shuffle = self.session.is_shuffle;
        let to = if shuffle {
            self.rng.gen_range(0..len)
        } else {
            (from + 1) % len
        };
        self.session.current_index = to;

        self.notify_history(PlaySource::Advance {
            from,
            to,
            shuffle,
            trigger,
            wrapped: !shuffle && to <= from,
        });
        self.start_current();
    }

    fn replace_queue(&mut self, playlist: Vec<Track>, index: usize) {
        self.session.playlist = playlist;
        self.session.current_index = index;
        self.publish(PlayerEvent::QueueReplaced {
            length: self.session.playlist.len(),
            index,
        });
    }

    /// Load the current entry from the top and start it.
    fn start_current(&mut self) {
        self.session.current_time = 0.0;
        self.duration = None;
        if let Some(track) = self.session.current_track() {
            info!(
                index = self.session.current_index,
                name = %track.name,
                path = %track.path,
                "starting track"
            );
        }

        if self.load_current(0.0) {
            self.set_phase(PlayerPhase::Loading);
            self.try_play();
        }
        self.publish_track();
        self.publish_time();
        self.persist();
    }

    /// Hand the current entry to the output, positioned at `time`.
    /// A failed load leaves the engine paused on that entry.
    fn load_current(&mut self, time: f64) -> bool {
        let Some(track) = self.session.current_track() else {
            return false;
        };
        let url = track.media_url(&self.options.media_endpoint);

        match self.output.load(&url) {
            Ok(()) => {
                if time > 0.0 {
                    self.output.seek(time);
                }
                true
            }
            Err(e) => {
                warn!(url = %url, error = %e, "failed to load track");
                self.set_phase(PlayerPhase::Paused);
                false
            }
        }
    }

    /// Ask the output to play. A refusal is logged and dropped, never
    /// retried; a pending start falls back to paused.
    fn try_play(&mut self) {
        if let Err(e) = self.output.play() {
            warn!(error = %e, "playback did not start");
            if self.phase == PlayerPhase::Loading {
                self.set_phase(PlayerPhase::Paused);
            }
        }
    }

    fn notify_history(&mut self, source: PlaySource) {
        if let Some(track) = self.session.current_track() {
            let entry = HistoryEntry::new(track, source);
            self.history.notify(entry);
        }
    }

    fn persist(&mut self) {
        match self.store.save(&self.session) {
            Ok(()) => self.last_flushed_time = self.session.current_time,
            Err(e) => warn!(error = %e, "skipping playback session write"),
        }
    }

    fn set_phase(&mut self, phase: PlayerPhase) {
        if self.phase == phase {
            return;
        }
        debug!(from = ?self.phase, to = ?phase, "phase change");
        self.phase = phase;
        self.publish(PlayerEvent::PlaybackChanged {
            phase,
            playing: phase.is_playing(),
        });
    }

    fn publish_track(&mut self) {
        if let Some(track) = self.session.current_track().cloned() {
            self.publish(PlayerEvent::TrackChanged {
                index: self.session.current_index,
                track,
            });
        }
    }

    fn publish_time(&mut self) {
        self.publish(PlayerEvent::TimeChanged {
            current: self.session.current_time,
            duration: self.duration,
        });
    }

    fn publish_modes(&mut self) {
        self.publish(PlayerEvent::ModesChanged {
            shuffle: self.session.is_shuffle,
            loop_mode: self.session.loop_mode,
        });
    }

    fn publish(&mut self, event: PlayerEvent) {
        self.subscribers.publish(event);
    }
}
