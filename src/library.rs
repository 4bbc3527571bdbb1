//! Playable media as the engine sees it.
//!
//! Tracks are discovered elsewhere (the directory scanner is an external
//! collaborator); this module only defines the `Track` value and the media
//! locator helpers used to turn a track path into a streaming URL and back.

mod locator;
mod model;

pub use locator::{media_file_param, media_url, resolve_media_path};
pub use model::Track;

#[cfg(test)]
mod tests;
