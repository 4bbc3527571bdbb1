use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::model::{PlaybackSession, decode_session, encode_session};
use crate::error::PersistenceError;

/// Durable storage for the playback session under a single fixed key.
pub trait SessionStore {
    /// Strict read: `Ok(None)` when nothing has been stored yet.
    fn try_load(&self) -> Result<Option<PlaybackSession>, PersistenceError>;

    /// Overwrite the stored session. Last write wins.
    fn save(&mut self, session: &PlaybackSession) -> Result<(), PersistenceError>;

    /// Tolerant read used at boot. Never fails: missing or unreadable data
    /// yields the canonical empty session.
    fn load(&self) -> PlaybackSession {
        match self.try_load() {
            Ok(Some(session)) => session,
            Ok(None) => {
                debug!("no stored playback session");
                PlaybackSession::default()
            }
            Err(e) => {
                warn!(error = %e, "discarding unreadable playback session");
                PlaybackSession::default()
            }
        }
    }
}

/// Stores the session as `<dir>/<key>.json`.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous session intact.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn try_load(&self) -> Result<Option<PlaybackSession>, PersistenceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        decode_session(&raw).map(Some)
    }

    fn save(&mut self, session: &PlaybackSession) -> Result<(), PersistenceError> {
        let raw = encode_session(session)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(raw.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Keeps the raw serialized session in memory.
///
/// Behaves like a browser-style key/value slot: the stored value is a
/// string, so corrupt contents can be planted with [`with_raw`](Self::with_raw)
/// and a byte quota can make writes fail.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    raw: Option<String>,
    quota: Option<usize>,
    writes: usize,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            ..Self::default()
        }
    }

    /// Reject any write longer than `bytes`.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SessionStore for MemorySessionStore {
    fn try_load(&self) -> Result<Option<PlaybackSession>, PersistenceError> {
        self.raw.as_deref().map(decode_session).transpose()
    }

    fn save(&mut self, session: &PlaybackSession) -> Result<(), PersistenceError> {
        let raw = encode_session(session)?;
        if let Some(quota) = self.quota {
            if raw.len() > quota {
                return Err(io::Error::other(format!(
                    "quota exceeded: {} bytes > {quota}",
                    raw.len()
                ))
                .into());
            }
        }
        self.raw = Some(raw);
        self.writes += 1;
        Ok(())
    }
}
