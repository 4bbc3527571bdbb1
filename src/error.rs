//! Error types shared by the playback engine and its adapters.
//!
//! None of these ever escape the engine's public operations: output failures
//! are logged and swallowed at the call site, persistence failures degrade to
//! "no prior session" on read and "skip this write" on save.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by an [`AudioOutputPort`](crate::audio::AudioOutputPort)
/// while loading or starting a track.
#[derive(Debug, Error)]
pub enum PlaybackStartError {
    /// `play()` was called before anything was loaded.
    #[error("no audio source loaded")]
    NoSource,

    /// The media locator could not be mapped to a playable resource.
    #[error("invalid media locator: {0}")]
    Locator(String),

    /// The resolved media file could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The media bytes could not be decoded.
    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    /// The output device refused the request.
    #[error("audio device error: {0}")]
    Device(String),
}

/// Failures while reading or writing the persisted playback session.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Parsed, but the values break a session invariant.
    #[error("session has an invalid shape: {0}")]
    Shape(String),
}
