use std::env;

use tracing::info;

mod command;
mod event_loop;
mod settings;
mod startup;


use command::track_for;

const USAGE: &str = "usage: encore [--print-config] [path...]";

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut paths = Vec::new();
    let mut print_config = false;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--print-config" => print_config = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ => paths.push(arg),
        }
    }

    let settings = settings::load_settings();
    if print_config {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    let mut player = startup::build_player(&settings)?;

    // Paths on the command line replace the restored queue.
    if !paths.is_empty() {
        info!(count = paths.len(), "queueing tracks from the command line");
        let playlist = paths.iter().map(|p| track_for(p)).collect();
        player.play_playlist(playlist, 0);
    }

    event_loop::run(&mut player, &settings);
    Ok(())
}
