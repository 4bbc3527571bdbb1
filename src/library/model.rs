use std::path::Path;

use serde::{Deserialize, Serialize};

use super::locator::media_url;

/// A single playable item with its descriptive metadata.
///
/// `path` is an opaque, relative resource locator; two tracks are the same
/// item when their paths are equal. Tracks are never mutated once queued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub path: String,
    /// Format tag such as `mp3` or `flac`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Source classification, e.g. "Original", "Rare" or "LIVE REMIX".
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
}

impl Track {
    /// Build a track from a relative path, deriving the name from the file
    /// stem and the format tag from the extension.
    pub fn from_path(path: impl Into<String>, category: impl Into<String>) -> Self {
        let path = path.into();
        let p = Path::new(&path);
        let name = p
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("UNKNOWN")
            .to_string();
        let kind = p
            .extension()
            .and_then(|s| s.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        Self {
            name,
            kind,
            category: category.into(),
            thumbnail: None,
            album: None,
            path,
        }
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    /// The streaming URL for this track under `endpoint` (e.g. `/media`).
    pub fn media_url(&self, endpoint: &str) -> String {
        media_url(endpoint, &self.path)
    }
}
