//! Media locator helpers.
//!
//! Tracks are streamed through `GET <endpoint>?file=<url-encoded path>`.
//! The output adapter serves that endpoint from a local media root, so the
//! same locator has to be parsed back into a file path.

use std::path::{Component, Path, PathBuf};

use url::form_urlencoded;

use crate::error::PlaybackStartError;

/// Build `<endpoint>?file=<encoded path>`.
pub fn media_url(endpoint: &str, path: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(path.as_bytes()).collect();
    format!("{endpoint}?file={encoded}")
}

/// Extract the decoded `file` query parameter from a media URL.
pub fn media_file_param(url: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == "file")
        .map(|(_, v)| v.into_owned())
}

/// Map a media URL onto a file below `root`.
///
/// Only plain relative paths are accepted; `..`, absolute paths and drive
/// prefixes are rejected so a locator can never leave the media root.
pub fn resolve_media_path(root: &Path, url: &str) -> Result<PathBuf, PlaybackStartError> {
    let file = media_file_param(url)
        .ok_or_else(|| PlaybackStartError::Locator(format!("missing `file` parameter in {url}")))?;

    let mut resolved = root.to_path_buf();
    let mut depth = 0usize;
    for component in Path::new(&file).components() {
        match component {
            Component::Normal(part) => {
                resolved.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            _ => {
                return Err(PlaybackStartError::Locator(format!(
                    "`{file}` escapes the media root"
                )));
            }
        }
    }

    if depth == 0 {
        return Err(PlaybackStartError::Locator(format!("empty media path in {url}")));
    }
    Ok(resolved)
}
