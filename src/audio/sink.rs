//! Utilities for creating `rodio` sinks from media files.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::PlaybackStartError;

/// Create a paused `Sink` for the file at `path` that starts playback at
/// `start_at`. Also returns the full length of the media when the decoder
/// knows it.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), PlaybackStartError> {
    let file = File::open(path).map_err(|source| PlaybackStartError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let decoder =
        Decoder::new(BufReader::new(file)).map_err(|e| PlaybackStartError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    let total = decoder.total_duration();

    let sink = Sink::connect_new(stream.mixer());
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    sink.append(decoder.skip_duration(start_at));
    sink.pause();
    Ok((sink, total))
}

/// Seconds to a `Duration`, treating negative or non-finite input as zero.
pub(super) fn secs_to_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
}
