use std::path::Path;

use encore::library::Track;

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Replace the queue with these paths and start the first.
    Play(Vec<String>),
    /// Replace the queue and start at `start`.
    Queue { start: usize, paths: Vec<String> },
    Toggle,
    Next,
    Prev,
    Shuffle,
    Loop,
    Seek(f64),
    Volume(f32),
    Status,
    History,
    Clear,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  play <path> [path...]      queue paths and play the first
  queue <start> <path...>    queue paths and play entry <start> (0-based)
  toggle | p                 play/pause
  next | n                   next track
  prev | b                   previous track (restarts after a few seconds)
  shuffle | s                toggle shuffle
  loop | r                   cycle loop: off -> one -> all
  seek <secs>                jump within the current track
  vol <0..1>                 set volume
  status                     show what is playing
  history                    show recent plays
  clear                      forget the queue
  quit | q                   save and exit";

impl Command {
    /// Parse a prompt line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<String> = words.map(str::to_string).collect();

        let cmd = match head {
            "play" => {
                if rest.is_empty() {
                    return Err("play needs at least one path".to_string());
                }
                Command::Play(rest)
            }
            "queue" => {
                let (start, paths) = rest
                    .split_first()
                    .ok_or_else(|| "queue needs a start index and paths".to_string())?;
                let start = start
                    .parse()
                    .map_err(|_| format!("not an index: {start}"))?;
                if paths.is_empty() {
                    return Err("queue needs at least one path".to_string());
                }
                Command::Queue {
                    start,
                    paths: paths.to_vec(),
                }
            }
            "toggle" | "p" => Command::Toggle,
            "next" | "n" => Command::Next,
            "prev" | "b" => Command::Prev,
            "shuffle" | "s" => Command::Shuffle,
            "loop" | "r" => Command::Loop,
            "seek" => Command::Seek(single_number(head, &rest)?),
            "vol" | "volume" => Command::Volume(single_number(head, &rest)?),
            "status" => Command::Status,
            "history" => Command::History,
            "clear" => Command::Clear,
            "help" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(format!("unknown command: {other} (try `help`)")),
        };
        Ok(Some(cmd))
    }
}

fn single_number<T: std::str::FromStr>(cmd: &str, args: &[String]) -> Result<T, String> {
    match args {
        [value] => value
            .parse()
            .map_err(|_| format!("{cmd}: not a number: {value}")),
        _ => Err(format!("{cmd} takes exactly one number")),
    }
}

/// Build a queue entry for a path relative to the media root. The category
/// is the parent directory's name.
pub fn track_for(path: &str) -> Track {
    let category = Path::new(path)
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|s| s.to_str())
        .unwrap_or("Music");
    Track::from_path(path, category)
}
