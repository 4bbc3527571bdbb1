//! encore: the playback engine behind a fan-site media browser.
//!
//! A single [`player::PlayerService`] owns the play queue, shuffle and loop
//! policy, one audio output and the durable playback session. Everything it
//! talks to sits behind a trait so the engine can run against a real device
//! ([`audio::RodioOutput`]) or in-memory fakes:
//!
//! - [`audio::AudioOutputPort`] plays media and reports what happened.
//! - [`session::SessionStore`] keeps the session across restarts.
//! - [`history::HistoryRecorder`] hears about every track start worth logging.

pub mod audio;
pub mod config;
pub mod error;
pub mod history;
pub mod library;
pub mod player;
pub mod session;
