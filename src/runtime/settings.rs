use tracing::warn;

use encore::config::Settings;

/// Settings for this run. A missing, unreadable or invalid config never stops
/// the player; it falls back to defaults with a warning.
pub fn load_settings() -> Settings {
    effective_settings(Settings::load())
}

pub fn effective_settings(loaded: Result<Settings, ::config::ConfigError>) -> Settings {
    let usable = loaded
        .map_err(|e| format!("failed to load config: {e}"))
        .and_then(|s| match s.validate() {
            Ok(()) => Ok(s),
            Err(msg) => Err(format!("invalid config: {msg}")),
        });

    usable.unwrap_or_else(|reason| {
        warn!(%reason, "using default settings");
        Settings::default()
    })
}
