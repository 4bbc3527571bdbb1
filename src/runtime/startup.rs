use tracing::info;

use encore::audio::RodioOutput;
use encore::config::Settings;
use encore::error::PlaybackStartError;
use encore::history::{HistoryRecorder, JsonlHistoryRecorder, NullHistoryRecorder};
use encore::player::{PlayerOptions, PlayerService};
use encore::session::FileSessionStore;

pub type Player = PlayerService<RodioOutput, FileSessionStore, Box<dyn HistoryRecorder>>;

/// Open the audio device, wire the stores and restore the last session
/// (paused).
pub fn build_player(settings: &Settings) -> Result<Player, PlaybackStartError> {
    let output = RodioOutput::open_default(settings.media.root.clone())?;
    let store = FileSessionStore::new(settings.session_dir(), &settings.session.key);
    info!(path = %store.path().display(), "session store");

    let history: Box<dyn HistoryRecorder> = if settings.history.enabled {
        let recorder = JsonlHistoryRecorder::new(settings.history_path());
        info!(path = %recorder.path().display(), "recording play history");
        Box::new(recorder)
    } else {
        Box::new(NullHistoryRecorder)
    };

    let mut player = PlayerService::new(output, store, history, PlayerOptions::from(settings));
    player.restore();
    Ok(player)
}
