use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::player::HistoryPolicy;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/encore/config.toml` or `~/.config/encore/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ENCORE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub session: SessionSettings,
    pub history: HistorySettings,
    pub media: MediaSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Past this many seconds, "previous" restarts the current track instead
    /// of moving back in the queue.
    pub restart_threshold_secs: f64,
    /// Minimum movement of the playback clock before a time update is
    /// written to the session store.
    pub time_flush_interval_secs: f64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            restart_threshold_secs: 3.0,
            time_flush_interval_secs: 5.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Directory holding the session file. Defaults to the XDG data dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Fixed storage key; the session is written to `<dir>/<key>.json`.
    pub key: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            dir: None,
            key: "playback-session".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Whether play history is recorded at all.
    pub enabled: bool,
    /// History file (JSON lines). Defaults to `<session dir>/history.jsonl`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Record an entry when "previous" moves to another track.
    pub notify_on_previous: bool,
    /// Record an entry when loop-single restarts the current track.
    pub notify_on_loop_restart: bool,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
            notify_on_previous: false,
            notify_on_loop_restart: false,
        }
    }
}

impl HistorySettings {
    pub fn policy(&self) -> HistoryPolicy {
        HistoryPolicy {
            notify_on_previous: self.notify_on_previous,
            notify_on_loop_restart: self.notify_on_loop_restart,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MediaSettings {
    /// Local directory the media endpoint serves from.
    pub root: PathBuf,
    /// Path of the streaming endpoint, e.g. `/media`.
    pub endpoint: String,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            endpoint: "/media".to_string(),
        }
    }
}
