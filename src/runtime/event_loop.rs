use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use encore::audio::AudioOutputPort;
use encore::config::Settings;
use encore::history::{HistoryRecorder, JsonlHistoryRecorder};
use encore::player::{LoopMode, PlayerEvent, PlayerPhase, PlayerService, PlayerSnapshot};
use encore::session::SessionStore;

use super::command::{Command, HELP, track_for};
use super::startup::Player;

/// How long to wait for input before pumping output events.
const POLL: Duration = Duration::from_millis(200);

/// Entries shown by the `history` command.
const HISTORY_TAIL: usize = 10;

/// Spawn a thread that forwards stdin lines. The channel closes at EOF.
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "stdin read failed");
                    break;
                }
            }
        }
    });
    rx
}

/// Run commands until `quit` or end of input, pumping output events in
/// between. The session is flushed on the way out.
pub fn run(player: &mut Player, settings: &Settings) {
    let lines = spawn_stdin_reader();
    let events = player.subscribe();

    println!("{}", format_status(&player.snapshot()));

    loop {
        match lines.recv_timeout(POLL) {
            Ok(line) => {
                if handle_line(player, settings, &line) == Flow::Quit {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                player.pump();
            }
            Err(RecvTimeoutError::Disconnected) => {
                debug!("input closed");
                break;
            }
        }

        for event in events.try_iter() {
            announce(&event);
        }
    }

    player.flush();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run one prompt line, then apply whatever the output reported meanwhile
/// so a busy prompt never holds back end-of-track handling.
pub fn handle_line<A, S, H>(
    player: &mut PlayerService<A, S, H>,
    settings: &Settings,
    line: &str,
) -> Flow
where
    A: AudioOutputPort,
    S: SessionStore,
    H: HistoryRecorder,
{
    match Command::parse(line) {
        Ok(Some(Command::Quit)) => return Flow::Quit,
        Ok(Some(cmd)) => dispatch(player, settings, cmd),
        Ok(None) => {}
        Err(msg) => println!("{msg}"),
    }
    player.pump();
    Flow::Continue
}

fn dispatch<A, S, H>(player: &mut PlayerService<A, S, H>, settings: &Settings, cmd: Command)
where
    A: AudioOutputPort,
    S: SessionStore,
    H: HistoryRecorder,
{
    match cmd {
        Command::Play(paths) => {
            let playlist = paths.iter().map(|p| track_for(p)).collect();
            player.play_playlist(playlist, 0);
        }
        Command::Queue { start, paths } => {
            let playlist = paths.iter().map(|p| track_for(p)).collect();
            player.play_playlist(playlist, start);
        }
        Command::Toggle => player.toggle_play(),
        Command::Next => player.next_track(),
        Command::Prev => player.prev_track(),
        Command::Shuffle => player.toggle_shuffle(),
        Command::Loop => player.toggle_loop(),
        Command::Seek(secs) => player.seek(secs),
        Command::Volume(volume) => player.set_volume(volume),
        Command::Status => println!("{}", format_status(&player.snapshot())),
        Command::History => print_history(settings),
        Command::Clear => player.clear(),
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}

fn announce(event: &PlayerEvent) {
    match event {
        PlayerEvent::TrackChanged { index, track } => {
            println!("now playing #{}: {} [{}]", index + 1, track.name, track.category);
        }
        PlayerEvent::ModesChanged { shuffle, loop_mode } => {
            println!(
                "shuffle {}, loop {}",
                on_off(*shuffle),
                loop_label(*loop_mode)
            );
        }
        PlayerEvent::PlaybackChanged {
            phase: PlayerPhase::Ended,
            ..
        } => println!("end of queue"),
        PlayerEvent::Cleared => println!("queue cleared"),
        _ => {}
    }
}

fn print_history(settings: &Settings) {
    if !settings.history.enabled {
        println!("history is disabled");
        return;
    }
    let recorder = JsonlHistoryRecorder::new(settings.history_path());
    match recorder.read_all() {
        Ok(records) if records.is_empty() => println!("no plays recorded yet"),
        Ok(records) => {
            let skip = records.len().saturating_sub(HISTORY_TAIL);
            for record in &records[skip..] {
                println!(
                    "{}  {} [{}]",
                    record.played_at.format("%Y-%m-%d %H:%M:%S"),
                    record.entry.display_name,
                    record.entry.category
                );
            }
        }
        Err(e) => println!("could not read history: {e}"),
    }
}

pub fn format_status(s: &PlayerSnapshot) -> String {
    let Some(track) = &s.current_track else {
        return "nothing queued".to_string();
    };
    let state = match s.phase {
        PlayerPhase::Playing => "playing",
        PlayerPhase::Loading => "loading",
        PlayerPhase::Ended => "ended",
        PlayerPhase::Idle | PlayerPhase::Paused => "paused",
    };
    let duration = s.duration.map(format_time).unwrap_or_else(|| "?".into());
    let loop_mode = if s.is_loop {
        LoopMode::LoopOne
    } else if s.is_loop_all {
        LoopMode::LoopAll
    } else {
        LoopMode::NoLoop
    };

    format!(
        "[{state}] {}/{} {} ({}) {} / {duration}  vol {:.2}  shuffle {}  loop {}",
        s.current_index + 1,
        s.playlist.len(),
        track.name,
        track.category,
        format_time(s.current_time),
        s.volume,
        on_off(s.is_shuffle),
        loop_label(loop_mode),
    )
}

/// `m:ss`, rounding down.
pub fn format_time(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

fn loop_label(mode: LoopMode) -> &'static str {
    match mode {
        LoopMode::NoLoop => "off",
        LoopMode::LoopOne => "one",
        LoopMode::LoopAll => "all",
    }
}
